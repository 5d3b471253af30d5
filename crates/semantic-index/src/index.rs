//! TF-IDF index over curriculum sections.
//!
//! Build once per reference document, query many times.

use serde::Serialize;
use shared_types::{ReferenceDocument, SectionKey, TopicEntry};
use tracing::{debug, info};

use crate::error::IndexError;
use crate::gating::MatchStrength;
use crate::normalize::prepare;
use crate::tfidf::{SparseVector, TfidfVectorizer, VectorizerConfig};

#[derive(Debug, Clone)]
struct IndexedSection {
    key: SectionKey,
    title: String,
    vector: SparseVector,
}

/// One section that scored above the query threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionMatch {
    pub key: SectionKey,
    pub title: String,
    pub score: f64,
    pub strength: MatchStrength,
}

#[derive(Debug, Clone)]
pub struct SemanticIndex {
    sections: Vec<IndexedSection>,
    vectorizer: TfidfVectorizer,
}

impl SemanticIndex {
    /// Index every week and appendix section of `reference`, plus one extra
    /// entry per topic-map row.
    ///
    /// # Errors
    /// `IndexError::NoSections` when the document has no non-empty sections.
    pub fn build(reference: &str, topics: &[TopicEntry]) -> Result<Self, IndexError> {
        Self::build_with(VectorizerConfig::default(), reference, topics)
    }

    pub fn build_with(
        config: VectorizerConfig,
        reference: &str,
        topics: &[TopicEntry],
    ) -> Result<Self, IndexError> {
        let doc = ReferenceDocument::parse(reference);

        let mut entries: Vec<(SectionKey, String, String)> = Vec::new();
        for section in doc.sections() {
            let body = doc.body(section).trim();
            if body.is_empty() {
                continue;
            }
            entries.push((
                section.key,
                section.display_title(),
                format!("{} {}", section.title, body),
            ));
        }

        if entries.is_empty() {
            return Err(IndexError::NoSections);
        }

        for topic in topics {
            entries.push((
                topic.key,
                topic.title.to_string(),
                format!("{} {}", topic.title, topic.topics.join(" ")),
            ));
        }

        let documents: Vec<String> = entries.iter().map(|(_, _, text)| prepare(text)).collect();
        let vectorizer = TfidfVectorizer::fit(config, &documents)?;

        let sections: Vec<IndexedSection> = entries
            .into_iter()
            .zip(documents.iter())
            .map(|((key, title, _), prepared)| IndexedSection {
                key,
                title,
                vector: vectorizer.transform(prepared),
            })
            .collect();

        info!(
            sections = sections.len(),
            features = vectorizer.feature_count(),
            "Semantic index built"
        );

        Ok(Self {
            sections,
            vectorizer,
        })
    }

    /// Sections scoring at least `threshold`, best first.
    pub fn query(&self, text: &str, threshold: f64) -> Vec<SectionMatch> {
        let query = self.vectorizer.transform(&prepare(text));
        if query.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<SectionMatch> = self
            .sections
            .iter()
            .filter_map(|section| {
                let score = query.dot(&section.vector);
                (score >= threshold).then(|| SectionMatch {
                    key: section.key,
                    title: section.title.clone(),
                    score,
                    strength: MatchStrength::from(score),
                })
            })
            .collect();

        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        debug!(matches = matches.len(), threshold, "Semantic query");
        matches
    }

    pub fn is_covered(&self, text: &str, threshold: f64) -> bool {
        !self.query(text, threshold).is_empty()
    }

    /// Key of the highest-scoring section, if any clears `threshold`.
    pub fn best_section(&self, text: &str, threshold: f64) -> Option<SectionKey> {
        self.query(text, threshold).first().map(|m| m.key)
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn feature_count(&self) -> usize {
        self.vectorizer.feature_count()
    }
}
