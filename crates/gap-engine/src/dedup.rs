//! Cross-source deduplication
//!
//! The same launch shows up on the blog, the changelog and a dozen forum
//! threads. Gaps are grouped by a topic key and each group collapses into
//! its most urgent, most detailed member.

use std::cmp::Reverse;
use std::collections::HashMap;

use shared_types::{Gap, Source};
use tracing::debug;

use crate::patterns::{first_match, KNOWN_TOPICS};

/// First known high-signal phrase in the gap's text, else its section set.
pub fn topic_key(gap: &Gap) -> String {
    let text = gap.update.combined_text();
    if let Some(topic) = first_match(&text, KNOWN_TOPICS) {
        return topic.to_string();
    }
    let keys = gap
        .affected_sections
        .iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!("sections:{}", keys)
}

/// Merge gaps that share a topic key. Group order follows first appearance.
pub fn deduplicate_cross_source(gaps: Vec<Gap>) -> Vec<Gap> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<Gap>> = Vec::new();

    for gap in gaps {
        let key = topic_key(&gap);
        match positions.get(&key) {
            Some(&idx) => groups[idx].push(gap),
            None => {
                positions.insert(key, groups.len());
                groups.push(vec![gap]);
            }
        }
    }

    groups.into_iter().map(merge_group).collect()
}

fn merge_group(mut group: Vec<Gap>) -> Gap {
    if group.len() == 1 {
        return group.remove(0);
    }

    // Stable: ties keep arrival order
    group.sort_by_key(|g| (g.priority.rank(), Reverse(g.update.content.len())));

    let source_count = group.iter().map(|g| g.source_count).sum();
    let lead_source = group[0].update.source;
    let mut others: Vec<Source> = Vec::new();
    for g in &group[1..] {
        if g.update.source != lead_source && !others.contains(&g.update.source) {
            others.push(g.update.source);
        }
    }

    let mut rest = group.split_off(1);
    let mut best = group.remove(0);
    for g in rest.iter_mut() {
        best.affected_sections.append(&mut g.affected_sections);
    }
    best.source_count = source_count;

    if !others.is_empty() {
        let names = others
            .iter()
            .map(Source::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        best.suggestion.push_str(&format!("\nAlso reported by: {}", names));
    }

    debug!(
        title = %best.update.title,
        merged = source_count,
        "Merged cross-source reports"
    );
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::gap;
    use shared_types::{GapType, Priority};

    #[test]
    fn test_topic_key_prefers_known_phrase() {
        let g = gap("Opus 4.6 released", "", Source::Blog, &[3], GapType::NewFeature, Priority::High);
        assert_eq!(topic_key(&g), "opus 4.6");

        let g = gap("Something else", "no keywords", Source::Blog, &[2, 9], GapType::Updated, Priority::Low);
        assert_eq!(topic_key(&g), "sections:2,9");
    }

    #[test]
    fn test_merges_same_topic() {
        let blog = gap("Opus 4.6 released", "", Source::Blog, &[3], GapType::NewFeature, Priority::High);
        let forum = gap("Opus 4.6 benchmarks", "", Source::Forum, &[3], GapType::NewFeature, Priority::Low);

        let result = deduplicate_cross_source(vec![blog, forum]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].source_count, 2);
        assert_eq!(result[0].priority, Priority::High);
        assert!(result[0].suggestion.ends_with("\nAlso reported by: forum"));
    }

    #[test]
    fn test_merge_keeps_max_priority_regardless_of_order() {
        let low = gap("Opus 4.6 thread", "long discussion text here", Source::Forum, &[3], GapType::NewFeature, Priority::Low);
        let med = gap("Opus 4.6 post", "", Source::Social, &[11], GapType::NewFeature, Priority::Medium);
        let high = gap("Opus 4.6 launch", "", Source::Blog, &[0], GapType::NewFeature, Priority::High);

        let result = deduplicate_cross_source(vec![low, med, high]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].priority, Priority::High);
        assert_eq!(result[0].update.source, Source::Blog);
        assert_eq!(result[0].source_count, 3);
        let keys: Vec<u32> = result[0].affected_sections.iter().copied().collect();
        assert_eq!(keys, vec![0, 3, 11]);
    }

    #[test]
    fn test_also_reported_by_skips_lead_source() {
        let first = gap("Opus 4.6 thread", "long forum thread about opus results", Source::Forum, &[3], GapType::NewFeature, Priority::Low);
        let second = gap("Opus 4.6 question", "short", Source::Forum, &[3], GapType::NewFeature, Priority::Low);
        let video = gap("Opus 4.6 walkthrough", "clip", Source::Video, &[3], GapType::NewFeature, Priority::Low);

        let merged = deduplicate_cross_source(vec![first.clone(), second.clone()]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].source_count, 2);
        assert!(!merged[0].suggestion.contains("Also reported by"));

        let merged = deduplicate_cross_source(vec![first, second, video]);
        assert!(merged[0].suggestion.ends_with("\nAlso reported by: video"));
    }

    #[test]
    fn test_ties_prefer_longer_content() {
        let short = gap("MCP update", "mcp", Source::Forum, &[10], GapType::Updated, Priority::Low);
        let long = gap("MCP deep dive", "mcp servers explained at length", Source::Video, &[10], GapType::Updated, Priority::Low);
        let result = deduplicate_cross_source(vec![short, long]);
        assert_eq!(result[0].update.title, "MCP deep dive");
    }

    #[test]
    fn test_keeps_different_topics() {
        let mcp = gap("MCP update", "mcp features", Source::Blog, &[10], GapType::NewFeature, Priority::High);
        let other = gap("Something else entirely", "no keywords", Source::Blog, &[0], GapType::NewTopic, Priority::Low);
        let result = deduplicate_cross_source(vec![mcp, other]);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].update.title, "MCP update");
    }
}
