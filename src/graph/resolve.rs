use std::collections::BTreeMap;

use crate::records::{RawLink, RawResearchRecord, TechRecord};
use crate::url::fallback_name_from_title;
use crate::{Result, TrawlError};

/// Infobox section labels that can never be real internal names. A record
/// carrying one means the internal-name extraction matched a label row,
/// which would corrupt every edge pointing at that page: the whole run
/// aborts rather than exporting bad data.
pub const RESERVED_LABELS: [&str; 4] = [
    "Allows",
    "Required technologies",
    "Effects",
    "Prototype type",
];

/// Rewrites URL-keyed records into an internal-name-keyed table.
///
/// Edge targets resolve to the crawled page's internal name when the URL
/// was visited, else to a deterministic fallback name derived from the
/// link title (or the URL slug). Edge lists are deduplicated in first-seen
/// order.
///
/// When two URLs resolve to the same internal name the record for the
/// lexicographically later URL wins; the collision is logged.
pub fn resolve_identifiers(
    records_by_url: &BTreeMap<String, RawResearchRecord>,
) -> Result<BTreeMap<String, TechRecord>> {
    let mut url_to_internal: BTreeMap<&str, &str> = BTreeMap::new();

    for (url, rec) in records_by_url {
        if RESERVED_LABELS.contains(&rec.internal_name.as_str()) {
            return Err(TrawlError::ReservedInternalName {
                name: rec.internal_name.clone(),
                url: url.clone(),
            });
        }
        url_to_internal.insert(url.as_str(), rec.internal_name.as_str());
    }

    let mut records_by_id: BTreeMap<String, TechRecord> = BTreeMap::new();

    for (url, rec) in records_by_url {
        let allows = rewrite_edges(&rec.allows_links_raw, &url_to_internal);
        let required = rewrite_edges(&rec.required_links_raw, &url_to_internal);

        let out = TechRecord {
            id: rec.internal_name.clone(),
            title: rec.title.clone(),
            internal_name: rec.internal_name.clone(),
            url: rec.url.clone(),
            allows,
            required_technologies: required,
            is_space_age_exclusive: rec.is_space_age_exclusive,
            unlocked_by_derived: Vec::new(),
            required_technologies_merged: Vec::new(),
            research_type: rec.research_type,
            research_science: rec.research_science.clone(),
            research_condition_text: rec.research_condition_text.clone(),
            error: rec.error.clone(),
        };

        if let Some(previous) = records_by_id.insert(rec.internal_name.clone(), out) {
            tracing::warn!(
                id = %rec.internal_name,
                dropped_url = %previous.url,
                kept_url = %url,
                "internal name collision; keeping later record"
            );
        }
    }

    Ok(records_by_id)
}

/// Maps raw links to internal names, deduplicated in first-seen order.
///
/// An empty internal name in the lookup counts as unresolved and falls
/// back to link-title naming, so edge identifiers are never empty.
fn rewrite_edges(links: &[RawLink], url_to_internal: &BTreeMap<&str, &str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();

    for link in links {
        let id = match url_to_internal.get(link.url.as_str()) {
            Some(internal) if !internal.is_empty() => (*internal).to_string(),
            _ => {
                let title = link.title.trim();
                let title = (!title.is_empty()).then_some(title);
                fallback_name_from_title(title, &link.url)
            }
        };

        if !out.contains(&id) {
            out.push(id);
        }
    }

    out
}
