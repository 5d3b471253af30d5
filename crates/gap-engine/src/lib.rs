//! Gap detection between a stream of product updates and a curriculum
//!
//! Updates are consolidated, routed to curriculum sections, classified,
//! checked for existing coverage, prioritised and merged across sources.
//! [`report::generate_report`] renders the result as markdown.

pub mod analyzer;
pub mod consolidate;
pub mod coverage;
pub mod dedup;
pub mod patterns;
pub mod report;
pub mod rules;
pub mod topics;

#[cfg(test)]
mod test_support;

pub use analyzer::{
    analyze_gaps, AnalysisOutcome, AnalysisSession, AnalysisStats, AnalyzerConfig, GapAnalyzer,
};
pub use coverage::{CoverageSignal, Reference};
pub use report::generate_report;
pub use semantic_index::{SemanticBackend, Thresholds};
pub use topics::{find_affected_sections, CURRICULUM_TOPIC_MAP};
