//! Update fetchers and the concurrent fan-in
//!
//! Network scrapers live outside this crate; they export JSON arrays of
//! update records which [`JsonFileFetcher`] reads and validates.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use shared_types::{RawUpdate, Source, UpdateRecord};
use tracing::{info, warn};

/// Characters of content compared when dropping duplicate reports
const DEDUP_PREFIX_CHARS: usize = 100;

#[async_trait]
pub trait Fetcher: Send + Sync {
    fn name(&self) -> &str;

    /// Updates published within the last `days_back` days.
    async fn fetch(&self, days_back: u32) -> anyhow::Result<Vec<UpdateRecord>>;
}

/// Reads a JSON array of raw update records from disk.
#[derive(Debug, Clone)]
pub struct JsonFileFetcher {
    name: String,
    source: Source,
    path: PathBuf,
}

impl JsonFileFetcher {
    pub fn new(source: Source, path: impl Into<PathBuf>) -> Self {
        Self {
            name: source.as_str().to_string(),
            source,
            path: path.into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[async_trait]
impl Fetcher for JsonFileFetcher {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, days_back: u32) -> anyhow::Result<Vec<UpdateRecord>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read feed: {}", self.path.display()))?;
        let records: Vec<RawUpdate> = serde_json::from_str(&raw)
            .with_context(|| format!("Malformed feed: {}", self.path.display()))?;

        let now = Utc::now();
        let mut updates = Vec::with_capacity(records.len());
        for mut record in records {
            if record.source.trim().is_empty() {
                record.source = self.source.as_str().to_string();
            }
            match UpdateRecord::try_from(record) {
                Ok(update) if update.is_within_window(days_back, now) => updates.push(update),
                Ok(_) => {}
                Err(err) => warn!(feed = %self.name, error = %err, "Skipping invalid record"),
            }
        }
        Ok(updates)
    }
}

/// Everything fetched in one run plus per-feed failures.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub updates: Vec<UpdateRecord>,
    pub errors: Vec<String>,
}

/// Run every fetcher concurrently. A failing feed contributes an error
/// string and the rest of the run continues.
pub async fn fetch_all(fetchers: &[Box<dyn Fetcher>], days_back: u32) -> FetchOutcome {
    let results = join_all(fetchers.iter().map(|f| f.fetch(days_back))).await;

    let mut outcome = FetchOutcome::default();
    let mut collected = Vec::new();
    for (fetcher, result) in fetchers.iter().zip(results) {
        match result {
            Ok(updates) => {
                info!(feed = fetcher.name(), count = updates.len(), "Fetched");
                collected.extend(updates);
            }
            Err(err) => {
                warn!(feed = fetcher.name(), error = %format!("{:#}", err), "Feed failed");
                outcome.errors.push(format!("{}: {:#}", fetcher.name(), err));
            }
        }
    }

    let total = collected.len();
    outcome.updates = dedup_by_content(collected);
    info!(
        unique = outcome.updates.len(),
        duplicates = total - outcome.updates.len(),
        errors = outcome.errors.len(),
        "Fetch complete"
    );
    outcome
}

/// Keep the first record for each lower-cased content prefix.
pub fn dedup_by_content(updates: Vec<UpdateRecord>) -> Vec<UpdateRecord> {
    let mut seen = HashSet::new();
    updates
        .into_iter()
        .filter(|u| {
            let prefix: String = u.content.chars().take(DEDUP_PREFIX_CHARS).collect();
            seen.insert(prefix.to_lowercase().trim().to_string())
        })
        .collect()
}
