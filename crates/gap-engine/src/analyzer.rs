//! Gap analysis pipeline
//!
//! consolidate release feed -> route to sections -> classify -> semantic
//! second opinion -> priority + suggestion -> cross-source merge -> sort

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use semantic_index::{build_oracle, CoverageOracle, SemanticBackend, Thresholds};
use serde::{Deserialize, Serialize};
use shared_types::audit::hash_text;
use shared_types::{Gap, GapType, UpdateRecord, NEW_SECTION};
use tracing::{debug, info};

use crate::consolidate::consolidate_releases;
use crate::coverage::Reference;
use crate::dedup::deduplicate_cross_source;
use crate::rules::classify::{classify, Classification};
use crate::rules::priority::assess_priority;
use crate::rules::suggestion::generate_suggestion;
use crate::topics::{find_affected_sections, CURRICULUM_TOPIC_MAP};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub backend: SemanticBackend,
    pub thresholds: Thresholds,
}

/// Counters for one analysis run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisStats {
    pub input: usize,
    pub after_consolidation: usize,
    pub skipped_covered: usize,
    pub skipped_semantic: usize,
    pub raw_gaps: usize,
    pub merged_gaps: usize,
}

#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub gaps: Vec<Gap>,
    pub stats: AnalysisStats,
}

struct CachedOracle {
    digest: String,
    backend: SemanticBackend,
    oracle: Box<dyn CoverageOracle>,
}

/// Caller-owned cache for the coverage oracle.
///
/// The oracle is rebuilt only when the reference text or the configured
/// backend changes, so a long-running caller can analyse many batches
/// against the same document cheaply.
#[derive(Default)]
pub struct AnalysisSession {
    cached: Option<CachedOracle>,
    builds: usize,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn oracle_for(&mut self, backend: SemanticBackend, reference: &str) -> &dyn CoverageOracle {
        let digest = hash_text(reference);
        let stale = self
            .cached
            .as_ref()
            .map(|c| c.digest != digest || c.backend != backend)
            .unwrap_or(false);
        if stale {
            self.cached = None;
        }

        let builds = &mut self.builds;
        let cached = self.cached.get_or_insert_with(|| {
            *builds += 1;
            CachedOracle {
                digest,
                backend,
                oracle: build_oracle(backend, reference, CURRICULUM_TOPIC_MAP),
            }
        });
        cached.oracle.as_ref()
    }

    /// How many times an oracle has been built in this session.
    pub fn index_builds(&self) -> usize {
        self.builds
    }

    pub fn clear(&mut self) {
        self.cached = None;
    }
}

impl fmt::Debug for AnalysisSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisSession")
            .field("cached", &self.cached.as_ref().map(|c| c.backend))
            .field("builds", &self.builds)
            .finish()
    }
}

/// GapAnalyzer entry point
#[derive(Debug, Clone, Default)]
pub struct GapAnalyzer {
    config: AnalyzerConfig,
}

impl GapAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Compare updates with the curriculum and return prioritised gaps.
    ///
    /// Without a reference every update that is not filtered by its own
    /// wording becomes a gap. An empty reference counts as absent.
    pub fn analyze(
        &self,
        session: &mut AnalysisSession,
        updates: &[Arc<UpdateRecord>],
        reference: Option<&str>,
    ) -> AnalysisOutcome {
        let mut stats = AnalysisStats {
            input: updates.len(),
            ..Default::default()
        };

        let reference = reference.filter(|r| !r.trim().is_empty());
        let reference_view = reference.map(Reference::new);
        let oracle = reference.map(|r| session.oracle_for(self.config.backend, r));

        // Pass A: the release feed becomes at most two summaries
        let (releases, mut records): (Vec<Arc<UpdateRecord>>, Vec<Arc<UpdateRecord>>) = updates
            .iter()
            .cloned()
            .partition(|u| u.source.is_release_feed());
        if !releases.is_empty() {
            let summaries = consolidate_releases(&releases);
            info!(
                releases = releases.len(),
                summaries = summaries.len(),
                "Consolidated release feed"
            );
            records.extend(summaries);
        }
        stats.after_consolidation = records.len();

        let mut gaps = Vec::new();
        for update in records {
            let text = update.combined_text();

            let mut sections = find_affected_sections(&text);
            if sections.len() == 1 && sections.contains(&NEW_SECTION) {
                if let Some(best) = oracle
                    .and_then(|o| o.best_section(&text, self.config.thresholds.routing))
                    .filter(|key| *key != NEW_SECTION)
                {
                    sections = BTreeSet::from([best]);
                }
            }

            let gap_type = match classify(&update, &text, reference_view.as_ref()) {
                Classification::AlreadyCovered(signal) => {
                    debug!(title = %update.title, ?signal, "Already covered");
                    stats.skipped_covered += 1;
                    continue;
                }
                Classification::Gap(gap_type) => gap_type,
            };

            if gap_type != GapType::Deprecated {
                if let Some(o) = oracle {
                    if o.is_covered(&text, self.config.thresholds.second_opinion) {
                        debug!(title = %update.title, "Semantically covered");
                        stats.skipped_semantic += 1;
                        continue;
                    }
                }
            }

            let priority = assess_priority(&update, gap_type, &sections);
            let suggestion = generate_suggestion(&update, &sections, gap_type);
            if suggestion.is_empty() {
                continue;
            }

            gaps.push(Gap::new(update, sections, gap_type, priority, suggestion));
        }
        stats.raw_gaps = gaps.len();

        // Pass B: merge reports of the same topic from different sources
        let mut gaps = deduplicate_cross_source(gaps);
        gaps.sort_by_key(|g| g.priority.rank());
        stats.merged_gaps = gaps.len();

        info!(
            input = stats.input,
            gaps = stats.merged_gaps,
            skipped_covered = stats.skipped_covered,
            skipped_semantic = stats.skipped_semantic,
            "Gap analysis complete"
        );

        AnalysisOutcome { gaps, stats }
    }
}

/// One-shot analysis with default configuration and a throwaway session.
pub fn analyze_gaps(updates: &[UpdateRecord], reference: Option<&str>) -> Vec<Gap> {
    let shared: Vec<Arc<UpdateRecord>> = updates.iter().cloned().map(Arc::new).collect();
    GapAnalyzer::default()
        .analyze(&mut AnalysisSession::new(), &shared, reference)
        .gaps
}
