//! Bag-of-n-grams TF-IDF vectoriser with L2-normalised sparse output.
//!
//! Weights follow the common smoothed formulation:
//! `tf = 1 + ln(count)` (sublinear) and `idf = ln((1 + n) / (1 + df)) + 1`.

use std::collections::{HashMap, HashSet};

use crate::error::IndexError;
use crate::normalize::tokenize;

pub const DEFAULT_MAX_FEATURES: usize = 5000;
pub const DEFAULT_NGRAM_RANGE: (usize, usize) = (1, 3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorizerConfig {
    /// Inclusive `(min, max)` n-gram lengths in words.
    pub ngram_range: (usize, usize),
    /// Keep only the most frequent features across the corpus.
    pub max_features: usize,
    pub sublinear_tf: bool,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            ngram_range: DEFAULT_NGRAM_RANGE,
            max_features: DEFAULT_MAX_FEATURES,
            sublinear_tf: true,
        }
    }
}

/// Sparse vector sorted by feature index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Build from raw weights, scaling to unit length. All-zero input stays empty.
    fn normalized(weights: HashMap<usize, f64>) -> Self {
        let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm == 0.0 {
            return Self::default();
        }
        let mut entries: Vec<(usize, f64)> = weights
            .into_iter()
            .map(|(index, weight)| (index, weight / norm))
            .collect();
        entries.sort_by_key(|(index, _)| *index);
        Self { entries }
    }

    /// Dot product; equals cosine similarity for unit vectors.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Contiguous word n-grams joined by single spaces.
pub fn ngrams(tokens: &[String], (min_n, max_n): (usize, usize)) -> Vec<String> {
    let mut out = Vec::new();
    for n in min_n.max(1)..=max_n {
        if n > tokens.len() {
            break;
        }
        for window in tokens.windows(n) {
            out.push(window.join(" "));
        }
    }
    out
}

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    config: VectorizerConfig,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learn vocabulary and document frequencies from a corpus.
    ///
    /// # Errors
    /// `IndexError::EmptyVocabulary` when no document yields a single token.
    pub fn fit(config: VectorizerConfig, documents: &[String]) -> Result<Self, IndexError> {
        let total_docs = documents.len();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        let mut corpus_freq: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let grams = ngrams(&tokenize(doc), config.ngram_range);
            let unique: HashSet<&String> = grams.iter().collect();
            for term in unique {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
            for term in grams.iter() {
                *corpus_freq.entry(term.clone()).or_insert(0) += 1;
            }
        }

        if doc_freq.is_empty() {
            return Err(IndexError::EmptyVocabulary);
        }

        let mut terms: Vec<(String, usize)> = corpus_freq.into_iter().collect();
        if terms.len() > config.max_features {
            // Most frequent first, lexicographic among equals
            terms.sort_by(|(a_term, a_count), (b_term, b_count)| {
                b_count.cmp(a_count).then_with(|| a_term.cmp(b_term))
            });
            terms.truncate(config.max_features);
        }
        let mut terms: Vec<String> = terms.into_iter().map(|(term, _)| term).collect();
        terms.sort();

        let n = total_docs as f64;
        let mut vocabulary = HashMap::with_capacity(terms.len());
        let mut idf = Vec::with_capacity(terms.len());
        for (index, term) in terms.into_iter().enumerate() {
            let df = doc_freq.get(&term).copied().unwrap_or(0) as f64;
            idf.push(((1.0 + n) / (1.0 + df)).ln() + 1.0);
            vocabulary.insert(term, index);
        }

        Ok(Self {
            config,
            vocabulary,
            idf,
        })
    }

    /// Project text onto the learned vocabulary. Unknown terms are ignored.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: HashMap<usize, usize> = HashMap::new();
        for gram in ngrams(&tokenize(text), self.config.ngram_range) {
            if let Some(&index) = self.vocabulary.get(&gram) {
                *counts.entry(index).or_insert(0) += 1;
            }
        }

        let weights = counts
            .into_iter()
            .map(|(index, count)| {
                let tf = if self.config.sublinear_tf {
                    1.0 + (count as f64).ln()
                } else {
                    count as f64
                };
                (index, tf * self.idf[index])
            })
            .collect();

        SparseVector::normalized(weights)
    }

    pub fn feature_count(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|&index| self.idf[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_ngrams_cover_range() {
        let tokens: Vec<String> = ["mcp", "server", "setup"].iter().map(|s| s.to_string()).collect();
        assert_eq!(
            ngrams(&tokens, (1, 3)),
            vec!["mcp", "server", "setup", "mcp server", "server setup", "mcp server setup"]
        );
        assert!(ngrams(&[], (1, 3)).is_empty());
    }

    #[test]
    fn test_rare_terms_weigh_more() {
        let vectorizer = TfidfVectorizer::fit(
            VectorizerConfig::default(),
            &docs(&["hooks events", "hooks skills", "hooks plugins"]),
        )
        .unwrap();

        let common = vectorizer.idf("hooks").unwrap();
        let rare = vectorizer.idf("plugins").unwrap();
        assert!(rare > common);
        // Present in every document: ln(4/4) + 1
        assert!((common - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_vectors_are_unit_length() {
        let vectorizer = TfidfVectorizer::fit(
            VectorizerConfig::default(),
            &docs(&["git branches commits", "terminal bash npm"]),
        )
        .unwrap();
        let v = vectorizer.transform("git branches bash");
        assert!((v.dot(&v) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_terms_give_empty_vector() {
        let vectorizer =
            TfidfVectorizer::fit(VectorizerConfig::default(), &docs(&["git branches"])).unwrap();
        let v = vectorizer.transform("quantum blockchain");
        assert!(v.is_empty());
        assert_eq!(v.dot(&vectorizer.transform("git")), 0.0);
    }

    #[test]
    fn test_max_features_keeps_most_frequent() {
        let config = VectorizerConfig {
            ngram_range: (1, 1),
            max_features: 2,
            sublinear_tf: true,
        };
        let vectorizer =
            TfidfVectorizer::fit(config, &docs(&["alpha alpha beta", "alpha beta gamma"])).unwrap();
        assert_eq!(vectorizer.feature_count(), 2);
        assert!(vectorizer.idf("alpha").is_some());
        assert!(vectorizer.idf("beta").is_some());
        assert!(vectorizer.idf("gamma").is_none());
    }

    #[test]
    fn test_empty_vocabulary() {
        let err = TfidfVectorizer::fit(VectorizerConfig::default(), &docs(&["the and of", ""]))
            .unwrap_err();
        assert_eq!(err, IndexError::EmptyVocabulary);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    const WORDS: &[&str] = &[
        "hooks", "skills", "agents", "mcp", "server", "git", "branches", "terminal", "plugins",
        "sandbox", "permissions", "commands",
    ];

    fn text_strategy() -> impl Strategy<Value = String> {
        prop::collection::vec(prop::sample::select(WORDS), 1..10).prop_map(|words| words.join(" "))
    }

    proptest! {
        /// Property: any non-empty projection has unit length
        #[test]
        fn transform_is_unit_length(
            corpus in prop::collection::vec(text_strategy(), 1..6),
            query in text_strategy(),
        ) {
            let vectorizer = TfidfVectorizer::fit(VectorizerConfig::default(), &corpus).unwrap();
            let v = vectorizer.transform(&query);
            if !v.is_empty() {
                prop_assert!((v.dot(&v) - 1.0).abs() < 1e-9);
            }
        }

        /// Property: cosine scores are symmetric and bounded
        #[test]
        fn dot_is_symmetric_and_bounded(
            corpus in prop::collection::vec(text_strategy(), 1..6),
            a in text_strategy(),
            b in text_strategy(),
        ) {
            let vectorizer = TfidfVectorizer::fit(VectorizerConfig::default(), &corpus).unwrap();
            let (va, vb) = (vectorizer.transform(&a), vectorizer.transform(&b));
            let score = va.dot(&vb);
            prop_assert!((score - vb.dot(&va)).abs() < 1e-12);
            prop_assert!((-1e-9..=1.0 + 1e-9).contains(&score));
        }
    }
}
