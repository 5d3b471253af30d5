//! Coverage backends behind one capability trait.
//!
//! The backend is chosen by configuration. A TF-IDF index that cannot be
//! built degrades to keyword overlap instead of failing the run.

use serde::{Deserialize, Serialize};
use shared_types::{SectionKey, TopicEntry};
use tracing::warn;

use crate::gating::KEYWORD_COVERAGE_RATIO;
use crate::index::SemanticIndex;
use crate::normalize::meaningful_words;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticBackend {
    #[default]
    Tfidf,
    Keyword,
}

/// Answers "is this text already in the curriculum, and where".
pub trait CoverageOracle: Send + Sync {
    fn backend(&self) -> SemanticBackend;

    fn is_covered(&self, text: &str, threshold: f64) -> bool;

    /// Best target section, or `None` when nothing clears `threshold`.
    fn best_section(&self, text: &str, threshold: f64) -> Option<SectionKey>;
}

impl CoverageOracle for SemanticIndex {
    fn backend(&self) -> SemanticBackend {
        SemanticBackend::Tfidf
    }

    fn is_covered(&self, text: &str, threshold: f64) -> bool {
        SemanticIndex::is_covered(self, text, threshold)
    }

    fn best_section(&self, text: &str, threshold: f64) -> Option<SectionKey> {
        SemanticIndex::best_section(self, text, threshold)
    }
}

/// Verbatim keyword overlap against the whole reference.
///
/// Ignores cosine thresholds and never routes to a section.
#[derive(Debug, Clone)]
pub struct KeywordOverlap {
    reference_lower: String,
    min_ratio: f64,
}

impl KeywordOverlap {
    pub fn new(reference: &str) -> Self {
        Self {
            reference_lower: reference.to_lowercase(),
            min_ratio: KEYWORD_COVERAGE_RATIO,
        }
    }

    /// Share of meaningful words found in the reference; `None` when the
    /// text has no meaningful words at all.
    pub fn overlap_ratio(&self, text: &str) -> Option<f64> {
        let words = meaningful_words(text);
        if words.is_empty() {
            return None;
        }
        let found = words
            .iter()
            .filter(|word| self.reference_lower.contains(word.as_str()))
            .count();
        Some(found as f64 / words.len() as f64)
    }
}

impl CoverageOracle for KeywordOverlap {
    fn backend(&self) -> SemanticBackend {
        SemanticBackend::Keyword
    }

    fn is_covered(&self, text: &str, _threshold: f64) -> bool {
        self.overlap_ratio(text)
            .map(|ratio| ratio >= self.min_ratio)
            .unwrap_or(false)
    }

    fn best_section(&self, _text: &str, _threshold: f64) -> Option<SectionKey> {
        None
    }
}

/// Build the configured backend for a reference document.
pub fn build_oracle(
    backend: SemanticBackend,
    reference: &str,
    topics: &[TopicEntry],
) -> Box<dyn CoverageOracle> {
    match backend {
        SemanticBackend::Keyword => Box::new(KeywordOverlap::new(reference)),
        SemanticBackend::Tfidf => match SemanticIndex::build(reference, topics) {
            Ok(index) => Box::new(index),
            Err(e) => {
                warn!(error = %e, "Semantic index unavailable, using keyword overlap");
                Box::new(KeywordOverlap::new(reference))
            }
        },
    }
}
