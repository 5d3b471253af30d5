//! Heuristic "already covered" checks against the curriculum text
//!
//! Checks run in order and the first hit wins:
//! 1. The update's URL is cited verbatim
//! 2. A trigger phrase in the update is confirmed by a curriculum phrase
//! 3. At least half of the distinct versions mentioned are in the curriculum

use std::collections::BTreeSet;

use shared_types::UpdateRecord;

use crate::patterns::{COVERAGE_PHRASES, VERSION};

/// The curriculum text with a lower-cased copy computed once per run.
#[derive(Debug, Clone)]
pub struct Reference<'a> {
    raw: &'a str,
    lower: String,
}

impl<'a> Reference<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self {
            raw,
            lower: raw.to_lowercase(),
        }
    }

    pub fn raw(&self) -> &'a str {
        self.raw
    }

    pub fn lower(&self) -> &str {
        &self.lower
    }
}

/// Which heuristic recognised the update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageSignal {
    UrlCited,
    TriggerPhrase { trigger: &'static str },
    VersionMajority { found: usize, total: usize },
}

/// `text` is the lower-cased combined title and content.
pub fn check_coverage(
    update: &UpdateRecord,
    text: &str,
    reference: &Reference<'_>,
) -> Option<CoverageSignal> {
    if !update.url.is_empty() && reference.raw().contains(update.url.as_str()) {
        return Some(CoverageSignal::UrlCited);
    }

    let title_lower = update.title.to_lowercase();
    for (trigger, confirmations) in COVERAGE_PHRASES {
        let triggered = title_lower.contains(trigger) || text.contains(trigger);
        if triggered
            && confirmations
                .iter()
                .any(|phrase| reference.lower().contains(phrase))
        {
            return Some(CoverageSignal::TriggerPhrase { trigger: *trigger });
        }
    }

    let versions: BTreeSet<&str> = VERSION.find_iter(text).map(|m| m.as_str()).collect();
    if !versions.is_empty() {
        let found = versions
            .iter()
            .filter(|v| reference.lower().contains(*v))
            .count();
        // found / total >= 0.5 without floating point
        if found * 2 >= versions.len() {
            return Some(CoverageSignal::VersionMajority {
                found,
                total: versions.len(),
            });
        }
    }

    None
}

pub fn is_covered(update: &UpdateRecord, text: &str, reference: &Reference<'_>) -> bool {
    check_coverage(update, text, reference).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_curriculum, update};
    use shared_types::Source;

    fn covered(title: &str, content: &str, curriculum: &str) -> Option<CoverageSignal> {
        let u = update(title, content, Source::Blog);
        check_coverage(&u, &u.combined_text(), &Reference::new(curriculum))
    }

    #[test]
    fn test_opus_model_covered() {
        assert_eq!(
            covered("Claude Opus 4.6 released", "New model", sample_curriculum()),
            Some(CoverageSignal::TriggerPhrase { trigger: "opus 4.6" })
        );
    }

    #[test]
    fn test_sonnet_model_covered() {
        assert!(covered("Sonnet 4.5 benchmarks", "Performance", sample_curriculum()).is_some());
    }

    #[test]
    fn test_hooks_covered() {
        assert!(covered("Hooks system update", "Hook events improved", sample_curriculum()).is_some());
    }

    #[test]
    fn test_mcp_server_covered() {
        assert!(covered("MCP server configuration guide", "MCP tool setup", sample_curriculum()).is_some());
    }

    #[test]
    fn test_agent_sdk_covered() {
        assert!(covered("Agent SDK released", "Build custom agents", sample_curriculum()).is_some());
    }

    #[test]
    fn test_trigger_without_confirmation_is_not_covered() {
        assert_eq!(covered("Cowork launches", "Desktop agent", sample_curriculum()), None);
    }

    #[test]
    fn test_url_matching() {
        let curriculum = format!("{}\nhttps://example.com/already-there", sample_curriculum());
        let u = update("Something", "Something", Source::Blog).with_url("https://example.com/already-there");
        assert_eq!(
            check_coverage(&u, &u.combined_text(), &Reference::new(&curriculum)),
            Some(CoverageSignal::UrlCited)
        );
    }

    #[test]
    fn test_url_monotonicity() {
        // Adding the update's own URL to any curriculum makes it covered
        let u = update("Quantum", "Quantum integration", Source::Forum).with_url("https://q.example/post");
        let before = "### WEEK 1: Terminal\n- bash\n";
        assert!(!is_covered(&u, &u.combined_text(), &Reference::new(before)));
        let after = format!("{}see https://q.example/post\n", before);
        assert!(is_covered(&u, &u.combined_text(), &Reference::new(&after)));
    }

    #[test]
    fn test_novel_topic_not_covered() {
        assert_eq!(
            covered("Brand new quantum computing feature", "Quantum integration", sample_curriculum()),
            None
        );
    }

    #[test]
    fn test_version_majority() {
        let curriculum = "### WEEK 3: Releases\nClaude Code v3.0.2 released\n";
        assert_eq!(
            covered("Release notes", "Changes in v3.0.2 and v3.0.1", curriculum),
            Some(CoverageSignal::VersionMajority { found: 1, total: 2 })
        );
        assert_eq!(covered("Release notes", "Changes in v3.0.1 and v3.0.3 and v3.0.2", curriculum), None);
    }

    #[test]
    fn test_version_majority_counts_distinct_versions() {
        let curriculum = "Claude Code v3.0.2 released\n";
        // v3.0.1 mentioned three times still counts once
        assert!(covered("Notes", "v3.0.1 v3.0.1 v3.0.1 and v3.0.2", curriculum).is_some());
    }
}
