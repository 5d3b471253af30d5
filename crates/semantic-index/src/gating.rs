//! Similarity thresholds and the strength buckets derived from them
//!
//! - Strong (>= 0.30): confident enough to drop an update as already covered
//! - Covered (0.20-0.30): default "is this topic in the curriculum" bar
//! - Related (0.15-0.20): shows up in query results
//! - Routable (0.10-0.15): good enough to pick a target week
//! - Weak (< 0.10): ignored

use serde::{Deserialize, Serialize};

pub const ROUTING_THRESHOLD: f64 = 0.10;
pub const QUERY_THRESHOLD: f64 = 0.15;
pub const COVERAGE_THRESHOLD: f64 = 0.20;
pub const SECOND_OPINION_THRESHOLD: f64 = 0.30;

/// Share of meaningful words that must appear verbatim for the keyword
/// fallback to call a topic covered.
pub const KEYWORD_COVERAGE_RATIO: f64 = 0.5;

/// Tunable cosine thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub query: f64,
    pub coverage: f64,
    pub routing: f64,
    pub second_opinion: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            query: QUERY_THRESHOLD,
            coverage: COVERAGE_THRESHOLD,
            routing: ROUTING_THRESHOLD,
            second_opinion: SECOND_OPINION_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStrength {
    Strong,
    Covered,
    Related,
    Routable,
    Weak,
}

impl From<f64> for MatchStrength {
    fn from(score: f64) -> Self {
        if score >= SECOND_OPINION_THRESHOLD {
            MatchStrength::Strong
        } else if score >= COVERAGE_THRESHOLD {
            MatchStrength::Covered
        } else if score >= QUERY_THRESHOLD {
            MatchStrength::Related
        } else if score >= ROUTING_THRESHOLD {
            MatchStrength::Routable
        } else {
            MatchStrength::Weak
        }
    }
}
