//! Turn detected gaps into edit instructions

use shared_types::{EditAction, EditInstruction, Gap, GapType, SectionKey, NEW_SECTION};

const TITLE_CHARS: usize = 100;
const SUMMARY_CHARS: usize = 150;
const HEADING_CHARS: usize = 80;
const NOTICE_HEADING_CHARS: usize = 60;

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// First 150 chars of the content, cut back to a word boundary with an
/// ellipsis unless the cut already ends a sentence.
fn summarize(content: &str) -> String {
    let summary = truncate_chars(content, SUMMARY_CHARS).trim();
    if summary.is_empty() || summary.ends_with('.') {
        return summary.to_string();
    }
    let head = summary
        .rsplit_once(' ')
        .map(|(head, _)| head)
        .unwrap_or(summary);
    format!("{}...", head)
}

/// Lowest real section the gap touches, or the new-section key.
fn target_section(gap: &Gap) -> SectionKey {
    gap.affected_sections
        .iter()
        .copied()
        .find(|key| *key != NEW_SECTION)
        .unwrap_or(NEW_SECTION)
}

pub fn instruction_for_gap(gap: &Gap) -> EditInstruction {
    let update = &gap.update;
    let date = if update.date.is_empty() {
        "unknown"
    } else {
        truncate_chars(&update.date, 10)
    };
    let title = truncate_chars(&update.title, TITLE_CHARS).trim();
    let summary = summarize(&update.content);
    let section = target_section(gap);

    let (section_key, heading, action, body) = match gap.gap_type {
        GapType::Deprecated => (
            section,
            format!("Deprecation: {}", truncate_chars(title, NOTICE_HEADING_CHARS)),
            EditAction::Append,
            format!(
                "> **Deprecation Notice ({}):** {}. {} [Source]({})",
                date, title, summary, update.url
            ),
        ),
        GapType::NewFeature => (
            section,
            truncate_chars(title, HEADING_CHARS).to_string(),
            if section == NEW_SECTION {
                EditAction::New
            } else {
                EditAction::Append
            },
            format!(
                "**{}** (added {})\n{}\nSource: {}",
                title, date, summary, update.url
            ),
        ),
        GapType::Updated => (
            section,
            format!("Update: {}", truncate_chars(title, NOTICE_HEADING_CHARS)),
            EditAction::Append,
            format!(
                "**Update ({}):** {}. {} [Source]({})",
                date, title, summary, update.url
            ),
        ),
        GapType::NewTopic => (
            NEW_SECTION,
            truncate_chars(title, HEADING_CHARS).to_string(),
            EditAction::New,
            format!(
                "**{}** (added {})\n{}\nSource: {}",
                title, date, summary, update.url
            ),
        ),
    };

    EditInstruction {
        section_key,
        title: heading,
        action,
        body,
        reason: format!("Auto-applied: {} from {}", gap.gap_type.as_str(), update.source),
    }
}

pub fn instructions_for_gaps(gaps: &[Gap]) -> Vec<EditInstruction> {
    gaps.iter().map(instruction_for_gap).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_types::{Priority, Source, UpdateRecord};
    use std::sync::Arc;

    fn gap(title: &str, content: &str, sections: &[SectionKey], gap_type: GapType) -> Gap {
        let update = UpdateRecord::new(Source::Blog, title, content)
            .with_url("https://example.com")
            .with_date("2026-02-01T10:00:00Z");
        Gap::new(
            Arc::new(update),
            sections.iter().copied().collect(),
            gap_type,
            Priority::High,
            format!("Suggestion for {}", title),
        )
    }

    #[test]
    fn test_new_feature_with_week() {
        let g = gap(
            "New Agent SDK Feature",
            "The agent SDK now supports streaming responses",
            &[9],
            GapType::NewFeature,
        );
        let edit = instruction_for_gap(&g);
        assert_eq!(edit.section_key, 9);
        assert_eq!(edit.action, EditAction::Append);
        assert_eq!(edit.title, "New Agent SDK Feature");
        assert_eq!(
            edit.body,
            "**New Agent SDK Feature** (added 2026-02-01)\n\
             The agent SDK now supports streaming...\n\
             Source: https://example.com"
        );
        assert_eq!(edit.reason, "Auto-applied: new_feature from blog");
    }

    #[test]
    fn test_new_feature_without_week() {
        let edit = instruction_for_gap(&gap("Brand New Concept", "Something entirely new", &[0], GapType::NewFeature));
        assert_eq!(edit.section_key, 0);
        assert_eq!(edit.action, EditAction::New);
    }

    #[test]
    fn test_merged_sections_target_real_week() {
        let edit = instruction_for_gap(&gap("Merged", "text", &[0, 10, 11], GapType::NewFeature));
        assert_eq!(edit.section_key, 10);
        assert_eq!(edit.action, EditAction::Append);
    }

    #[test]
    fn test_deprecation_notice() {
        let edit = instruction_for_gap(&gap(
            "Old Feature Removed",
            "This feature is no longer available.",
            &[3],
            GapType::Deprecated,
        ));
        assert_eq!(edit.action, EditAction::Append);
        assert_eq!(edit.title, "Deprecation: Old Feature Removed");
        assert_eq!(
            edit.body,
            "> **Deprecation Notice (2026-02-01):** Old Feature Removed. \
             This feature is no longer available. [Source](https://example.com)"
        );
    }

    #[test]
    fn test_update_note() {
        let edit = instruction_for_gap(&gap(
            "MCP Configuration Changed",
            "New config options available",
            &[10],
            GapType::Updated,
        ));
        assert_eq!(edit.section_key, 10);
        assert_eq!(edit.title, "Update: MCP Configuration Changed");
        assert!(edit.body.starts_with("**Update (2026-02-01):** MCP Configuration Changed."));
    }

    #[test]
    fn test_new_topic_forces_appendix() {
        let edit = instruction_for_gap(&gap("Quantum Integration", "New quantum work", &[5], GapType::NewTopic));
        assert_eq!(edit.section_key, 0);
        assert_eq!(edit.action, EditAction::New);
    }

    #[test]
    fn test_missing_date_reads_unknown() {
        let mut g = gap("Undated", "x", &[2], GapType::NewFeature);
        let mut update = (*g.update).clone();
        update.date = String::new();
        g.update = Arc::new(update);
        assert!(instruction_for_gap(&g).body.contains("(added unknown)"));
    }

    #[test]
    fn test_summary_cut_at_word_boundary() {
        let long = "word ".repeat(40);
        let summary = summarize(&long);
        assert!(summary.ends_with("word..."));
        assert!(summary.chars().count() <= SUMMARY_CHARS + 3);
        assert_eq!(summarize("Short sentence."), "Short sentence.");
        assert_eq!(summarize(""), "");
    }

    #[test]
    fn test_batch_conversion() {
        let gaps = vec![
            gap("A", "a", &[1], GapType::NewFeature),
            gap("B", "b", &[0], GapType::NewTopic),
        ];
        let edits = instructions_for_gaps(&gaps);
        assert_eq!(edits.len(), 2);
        assert!(instructions_for_gaps(&[]).is_empty());
    }
}
