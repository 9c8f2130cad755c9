use std::collections::BTreeMap;

use crate::records::TechRecord;

/// Populates the derived and merged prerequisite lists by inverting the
/// "allows" relation, in place.
///
/// Only identifiers present as keys accumulate inbound edges; edges
/// pointing at fallback-only (never-crawled) names contribute nothing to
/// the derived lists. Iteration is in identifier order, so the derived
/// lists are deterministic. Runs strictly after identifier resolution and
/// introduces no new identifiers.
pub fn invert_edges(records_by_id: &mut BTreeMap<String, TechRecord>) {
    let mut unlocked_by: BTreeMap<String, Vec<String>> = records_by_id
        .keys()
        .map(|id| (id.clone(), Vec::new()))
        .collect();

    for (parent_id, rec) in records_by_id.iter() {
        for child_id in &rec.allows {
            if let Some(inbound) = unlocked_by.get_mut(child_id) {
                inbound.push(parent_id.clone());
            }
        }
    }

    for (id, rec) in records_by_id.iter_mut() {
        let explicit = dedup_preserving_order(&rec.required_technologies);
        let derived = dedup_preserving_order(&unlocked_by.remove(id).unwrap_or_default());

        let mut merged = explicit;
        for parent in &derived {
            if !merged.contains(parent) {
                merged.push(parent.clone());
            }
        }

        rec.unlocked_by_derived = derived;
        rec.required_technologies_merged = merged;
    }
}

fn dedup_preserving_order(items: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        if !out.contains(item) {
            out.push(item.clone());
        }
    }
    out
}
