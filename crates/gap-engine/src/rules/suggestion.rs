use std::collections::BTreeSet;

use shared_types::{GapType, SectionKey, UpdateRecord, NEW_SECTION};

use crate::patterns::truncate_chars;

/// Characters of update content quoted in a suggestion.
pub const EXCERPT_CHARS: usize = 200;

/// "Week 3, Week 9", with `NEW_SECTION` rendered as "New Section".
pub fn section_refs(sections: &BTreeSet<SectionKey>) -> String {
    sections
        .iter()
        .map(|key| {
            if *key == NEW_SECTION {
                "New Section".to_string()
            } else {
                format!("Week {}", key)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Human-readable action text for a gap.
pub fn generate_suggestion(
    update: &UpdateRecord,
    sections: &BTreeSet<SectionKey>,
    gap_type: GapType,
) -> String {
    let refs = section_refs(sections);
    let excerpt = truncate_chars(update.content.trim(), EXCERPT_CHARS);

    let mut lines = match gap_type {
        GapType::Deprecated => vec![
            format!("DEPRECATION: {}", update.title),
            format!("Affects: {}", refs),
            "Action: Review and remove or replace deprecated content.".to_string(),
        ],
        GapType::NewFeature => vec![
            format!("NEW FEATURE: {}", update.title),
            format!("Add to: {}", refs),
            "Action: Add a new topic or exercise covering this feature.".to_string(),
        ],
        GapType::Updated => vec![
            format!("UPDATE: {}", update.title),
            format!("Update: {}", refs),
            "Action: Refresh existing content to reflect the changes.".to_string(),
        ],
        GapType::NewTopic => vec![
            format!("NEW TOPIC: {}", update.title),
            format!("Consider: Adding to {} or creating supplemental material.", refs),
        ],
    };

    lines.push(format!("Details: {}", excerpt));
    if !update.url.is_empty() {
        lines.push(format!("Source: {}", update.url));
    }
    lines.join("\n")
}
