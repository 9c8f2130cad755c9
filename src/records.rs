//! Record types flowing through the pipeline
//!
//! `RawResearchRecord` is keyed by page URL and produced once per visited
//! page during the crawl. `TechRecord` is keyed by internal name, produced
//! by identifier resolution and completed by edge inversion. Only
//! `TechRecord` reaches the JSONL output; its serde field order is the wire
//! format.

use serde::{Deserialize, Serialize};

use crate::url::fallback_name_from_title;

/// One extracted infobox link: absolute normalized URL plus the anchor's
/// title text (may be empty when the anchor carries no title attribute).
#[derive(Debug, Clone, PartialEq)]
pub struct RawLink {
    pub url: String,
    pub title: String,
}

impl RawLink {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }
}

/// Which infobox scope a research page was parsed from.
///
/// Pages covering both the base game and the expansion carry tabbed
/// infoboxes; the parser prefers the expansion tab when present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResearchVariant {
    /// Untabbed page; the whole document was the scope
    Single,
    /// The `tab-1` (base game) infobox tab
    BaseGame,
    /// The `tab-2` (expansion) infobox tab
    SpaceAge,
    /// Tabbed page whose selected tab had no recognizable class
    Unknown,
}

/// Science pack requirement details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchSciencePack {
    pub name: String,
    pub amount_per_unit: Option<f64>,
    pub amount_text: Option<String>,
}

/// Science-based research cost details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchScienceCost {
    pub time_seconds: Option<f64>,
    pub time_text: Option<String>,
    pub unit_count: Option<i64>,
    pub unit_count_text: Option<String>,
    #[serde(default)]
    pub science_packs: Vec<ResearchSciencePack>,
}

/// How a research is obtained: classic science packs, or a textual
/// trigger condition ("Researched by ...").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResearchKind {
    Science,
    Condition,
}

/// Parsed page data, keyed by wiki URL in the crawl table
#[derive(Debug, Clone, PartialEq)]
pub struct RawResearchRecord {
    pub id: String,
    pub title: Option<String>,
    pub internal_name: String,
    pub url: String,
    pub allows_links_raw: Vec<RawLink>,
    pub required_links_raw: Vec<RawLink>,
    pub is_space_age_exclusive: bool,
    pub selected_variant: ResearchVariant,
    pub research_type: Option<ResearchKind>,
    pub research_science: Option<ResearchScienceCost>,
    pub research_condition_text: Option<String>,
    pub error: Option<String>,
}

impl RawResearchRecord {
    /// Builds the synthetic record for a page that failed to fetch or
    /// parse. The identifier comes from the fallback-naming rule so that
    /// edges pointing at this URL resolve to the same name.
    pub fn failed(url: &str, error: String) -> Self {
        let fallback = fallback_name_from_title(None, url);
        Self {
            id: fallback.clone(),
            title: None,
            internal_name: fallback,
            url: url.to_string(),
            allows_links_raw: Vec::new(),
            required_links_raw: Vec::new(),
            is_space_age_exclusive: false,
            selected_variant: ResearchVariant::Unknown,
            research_type: None,
            research_science: None,
            research_condition_text: None,
            error: Some(error),
        }
    }
}

/// Normalized research record, keyed by internal name.
///
/// Field declaration order is the JSONL field order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechRecord {
    pub id: String,
    pub title: Option<String>,
    pub internal_name: String,
    pub url: String,
    pub allows: Vec<String>,
    pub required_technologies: Vec<String>,
    pub is_space_age_exclusive: bool,
    #[serde(default)]
    pub unlocked_by_derived: Vec<String>,
    #[serde(default)]
    pub required_technologies_merged: Vec<String>,
    pub research_type: Option<ResearchKind>,
    pub research_science: Option<ResearchScienceCost>,
    pub research_condition_text: Option<String>,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_record_uses_url_slug() {
        let rec = RawResearchRecord::failed(
            "https://wiki.factorio.com/Steel_processing_(research)",
            "boom".to_string(),
        );
        assert_eq!(rec.internal_name, "steel_processing_(research)");
        assert_eq!(rec.id, rec.internal_name);
        assert!(rec.allows_links_raw.is_empty());
        assert!(rec.required_links_raw.is_empty());
        assert_eq!(rec.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_research_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ResearchKind::Science).unwrap(),
            "\"science\""
        );
        assert_eq!(
            serde_json::to_string(&ResearchKind::Condition).unwrap(),
            "\"condition\""
        );
    }

    #[test]
    fn test_tech_record_field_order() {
        let rec = TechRecord {
            id: "automation".to_string(),
            title: Some("Automation".to_string()),
            internal_name: "automation".to_string(),
            url: "https://wiki.factorio.com/Automation_(research)".to_string(),
            allows: vec!["logistics".to_string()],
            required_technologies: vec![],
            is_space_age_exclusive: false,
            unlocked_by_derived: vec![],
            required_technologies_merged: vec![],
            research_type: None,
            research_science: None,
            research_condition_text: None,
            error: None,
        };
        let json = serde_json::to_string(&rec).unwrap();
        let id_pos = json.find("\"id\"").unwrap();
        let allows_pos = json.find("\"allows\"").unwrap();
        let merged_pos = json.find("\"required_technologies_merged\"").unwrap();
        let error_pos = json.find("\"error\"").unwrap();
        assert!(id_pos < allows_pos && allows_pos < merged_pos && merged_pos < error_pos);
        // absent optionals serialize as null, not as missing keys
        assert!(json.contains("\"research_type\":null"));
    }
}
