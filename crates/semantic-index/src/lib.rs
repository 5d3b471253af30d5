//! Semantic coverage checks for curriculum sections
//!
//! This crate provides:
//! - Text normalisation with domain synonym expansion
//! - A TF-IDF vectoriser (1-3 word n-grams, sublinear TF, L2 norm)
//! - A section index answering "covered?" and "which week?"
//! - A keyword-overlap fallback behind the same `CoverageOracle` trait

pub mod error;
pub mod gating;
pub mod index;
pub mod normalize;
pub mod oracle;
pub mod tfidf;

pub use error::IndexError;
pub use gating::{MatchStrength, Thresholds};
pub use index::{SectionMatch, SemanticIndex};
pub use oracle::{build_oracle, CoverageOracle, KeywordOverlap, SemanticBackend};

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::TopicEntry;

    const CURRICULUM: &str = "
### WEEK 9: Skills, Hooks & Custom Commands
Topics:
- Skills: SKILL.MD files for project patterns
- Skill frontmatter: name, description, allowed-tools
- Hooks: 14 events covering the full Claude Code lifecycle
- Hook types: command, prompt, agent
- Custom slash commands via .claude/commands

### WEEK 10: MCP Servers & Plugins
Topics:
- MCP server setup and configuration
- Model Context Protocol
- Tool search and resources
- fastmcp framework

### WEEK 11: Agent Teams & Parallel Sessions
Topics:
- Built-in subagent types
- Custom agents via .claude/agents
- Agent SDK
- Multi-agent orchestration
";

    fn index() -> SemanticIndex {
        SemanticIndex::build(CURRICULUM, &[]).unwrap()
    }

    #[test]
    fn test_build_indexes_every_week() {
        let idx = index();
        assert_eq!(idx.section_count(), 3);
        assert!(idx.feature_count() > 0);
    }

    #[test]
    fn test_build_without_sections_fails() {
        let err = SemanticIndex::build("plain notes, no headings", &[]).unwrap_err();
        assert_eq!(err, IndexError::NoSections);
    }

    #[test]
    fn test_query_hooks_synonyms() {
        let results = index().query("lifecycle event callbacks", gating::QUERY_THRESHOLD);
        assert!(!results.is_empty());
        assert_eq!(results[0].key, 9);
    }

    #[test]
    fn test_query_mcp() {
        let results = index().query("mcp server configuration", gating::QUERY_THRESHOLD);
        assert_eq!(results[0].key, 10);
        assert_eq!(results[0].title, "Week 10: MCP Servers & Plugins");
        assert_eq!(results[0].strength, MatchStrength::Strong);
    }

    #[test]
    fn test_query_results_sorted_descending() {
        let results = index().query("new hooks and lifecycle events for claude code", 0.0);
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_is_covered() {
        let idx = index();
        assert!(idx.is_covered("hooks and lifecycle events", gating::COVERAGE_THRESHOLD));
        assert!(!idx.is_covered("quantum computing blockchain", gating::COVERAGE_THRESHOLD));
    }

    #[test]
    fn test_best_section_agents() {
        let week = index().best_section(
            "multi-agent orchestration and subagents",
            gating::ROUTING_THRESHOLD,
        );
        assert_eq!(week, Some(11));
    }

    #[test]
    fn test_novel_topic_has_no_match() {
        let idx = index();
        assert!(idx.query("quantum blockchain AI fusion reactor", 0.0).is_empty());
        assert_eq!(idx.best_section("quantum blockchain AI fusion reactor", 0.1), None);
    }

    #[test]
    fn test_topic_map_entries_are_indexed() {
        const TOPICS: &[TopicEntry] = &[TopicEntry {
            key: 2,
            title: "Git & Version Control",
            phase: "Foundation",
            topics: &["git", "github", "version control", "branches"],
        }];
        let idx = SemanticIndex::build(CURRICULUM, TOPICS).unwrap();
        assert_eq!(idx.section_count(), 4);
        assert_eq!(idx.best_section("version control branches", 0.1), Some(2));
    }

    #[test]
    fn test_oracle_trait_delegates() {
        let oracle: Box<dyn CoverageOracle> = Box::new(index());
        assert_eq!(oracle.backend(), SemanticBackend::Tfidf);
        assert!(oracle.is_covered("hooks and lifecycle events", 0.2));
        assert_eq!(oracle.best_section("mcp server configuration", 0.1), Some(10));
    }
}
