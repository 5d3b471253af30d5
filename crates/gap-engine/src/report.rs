//! Markdown report of detected gaps

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use shared_types::{Gap, Priority, SectionKey, NEW_SECTION};

use crate::topics::section_title;

const TIERS: [(Priority, &str); 3] = [
    (Priority::High, "## High Priority"),
    (Priority::Medium, "## Medium Priority"),
    (Priority::Low, "## Low Priority"),
];

/// Render gaps grouped by priority tier, followed by an affected-sections
/// summary and any warnings collected while fetching.
pub fn generate_report(gaps: &[Gap], warnings: &[String], generated_at: DateTime<Utc>) -> String {
    let mut out = String::new();

    if gaps.is_empty() {
        out.push_str("**Curriculum is up to date!** No gaps found in recent updates.\n");
        push_warnings(&mut out, warnings);
        return out;
    }

    let count = |p: Priority| gaps.iter().filter(|g| g.priority == p).count();

    out.push_str("# Curriculum Update Report\n\n");
    out.push_str(&format!(
        "**Generated:** {}\n",
        generated_at.format("%Y-%m-%d %H:%M UTC")
    ));
    out.push_str(&format!(
        "**Total gaps found:** {} ({} high, {} medium, {} low priority)\n\n",
        gaps.len(),
        count(Priority::High),
        count(Priority::Medium),
        count(Priority::Low)
    ));

    for (priority, heading) in TIERS {
        let tier: Vec<&Gap> = gaps.iter().filter(|g| g.priority == priority).collect();
        if tier.is_empty() {
            continue;
        }
        out.push_str(heading);
        out.push_str("\n\n");
        for gap in tier {
            out.push_str(&gap.suggestion);
            if gap.source_count > 1 {
                out.push_str(&format!("\n({} sources)", gap.source_count));
            }
            out.push_str("\n\n---\n\n");
        }
    }

    let mut per_section: BTreeMap<SectionKey, usize> = BTreeMap::new();
    for gap in gaps {
        for key in &gap.affected_sections {
            *per_section.entry(*key).or_insert(0) += 1;
        }
    }

    out.push_str("## Affected Sections Summary\n\n");
    for (key, n) in per_section {
        let label = if key == NEW_SECTION {
            "New Section Needed".to_string()
        } else {
            match section_title(key) {
                Some(title) => format!("Week {}: {}", key, title),
                None => format!("Week {}", key),
            }
        };
        out.push_str(&format!("- **{}**: {} update(s)\n", label, n));
    }

    push_warnings(&mut out, warnings);
    out
}

fn push_warnings(out: &mut String, warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }
    out.push_str("\n## Warnings\n\n");
    for warning in warnings {
        out.push_str(&format!("- {}\n", warning));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::gap;
    use chrono::TimeZone;
    use shared_types::{GapType, Source};

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 10, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_empty_report() {
        let report = generate_report(&[], &[], at());
        assert!(report.contains("up to date"));
        assert!(!report.contains("Warnings"));
    }

    #[test]
    fn test_empty_report_still_lists_warnings() {
        let report = generate_report(&[], &["forum: timed out".to_string()], at());
        assert!(report.contains("## Warnings\n\n- forum: timed out"));
    }

    #[test]
    fn test_report_groups_by_priority() {
        let gaps = vec![
            gap("Hooks v2", "", Source::Blog, &[9], GapType::NewFeature, Priority::High),
            gap("Git tip", "", Source::Forum, &[2], GapType::Updated, Priority::Low),
            gap("Voice", "", Source::Forum, &[0], GapType::NewTopic, Priority::Low),
        ];
        let report = generate_report(&gaps, &[], at());

        assert!(report.starts_with("# Curriculum Update Report"));
        assert!(report.contains("**Generated:** 2026-02-10 09:30 UTC"));
        assert!(report.contains("**Total gaps found:** 3 (1 high, 0 medium, 2 low priority)"));
        assert!(report.contains("## High Priority"));
        assert!(!report.contains("## Medium Priority"));

        let high = report.find("## High Priority").unwrap();
        let low = report.find("## Low Priority").unwrap();
        assert!(high < low);
        assert!(report.find("Suggestion for Hooks v2").unwrap() < low);

        assert!(report.contains("- **New Section Needed**: 1 update(s)"));
        assert!(report.contains("- **Week 2: Git & Version Control**: 1 update(s)"));
        assert!(report.contains("- **Week 9: Skills, Hooks & Custom Commands**: 1 update(s)"));
    }

    #[test]
    fn test_report_notes_merged_sources() {
        let mut merged = gap("MCP", "", Source::Blog, &[10], GapType::NewFeature, Priority::High);
        merged.source_count = 3;
        let report = generate_report(&[merged], &[], at());
        assert!(report.contains("(3 sources)"));
    }
}
