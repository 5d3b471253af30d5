//! Seen-update cache and applied-edit log, persisted as JSON

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{Source, UpdateRecord};
use tracing::warn;

/// Oldest keys are dropped beyond this many
pub const MAX_SEEN_UPDATES: usize = 500;

const KEY_TITLE_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedRecord {
    pub key: String,
    pub details: String,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SeenCache {
    /// Insertion order, oldest first
    seen_updates: Vec<String>,
    #[serde(default)]
    last_check: Option<DateTime<Utc>>,
    #[serde(default)]
    applied_updates: Vec<AppliedRecord>,
    #[serde(skip)]
    index: HashSet<String>,
}

/// `source::title`, with the title lower-cased and cut to 50 chars.
pub fn update_key(source: Source, title: &str) -> String {
    let title: String = title.trim().to_lowercase().chars().take(KEY_TITLE_CHARS).collect();
    format!("{}::{}", source, title)
}

impl SeenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A missing or unreadable cache starts fresh.
    pub fn load(path: &Path) -> Self {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => return Self::new(),
        };
        match serde_json::from_str::<SeenCache>(&raw) {
            Ok(mut cache) => {
                cache.index = cache.seen_updates.iter().cloned().collect();
                cache
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Failed to load cache");
                Self::new()
            }
        }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create state dir: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write cache: {}", path.display()))
    }

    pub fn is_seen(&self, update: &UpdateRecord) -> bool {
        self.index.contains(&update_key(update.source, &update.title))
    }

    pub fn mark_seen<'a>(&mut self, updates: impl IntoIterator<Item = &'a UpdateRecord>, now: DateTime<Utc>) {
        for update in updates {
            let key = update_key(update.source, &update.title);
            if self.index.insert(key.clone()) {
                self.seen_updates.push(key);
            }
        }
        self.last_check = Some(now);
        self.trim();
    }

    pub fn mark_applied(&mut self, key: impl Into<String>, details: impl Into<String>, now: DateTime<Utc>) {
        self.applied_updates.push(AppliedRecord {
            key: key.into(),
            details: details.into(),
            applied_at: now,
        });
    }

    pub fn last_check(&self) -> Option<DateTime<Utc>> {
        self.last_check
    }

    pub fn applied(&self) -> &[AppliedRecord] {
        &self.applied_updates
    }

    pub fn len(&self) -> usize {
        self.seen_updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen_updates.is_empty()
    }

    fn trim(&mut self) {
        if self.seen_updates.len() <= MAX_SEEN_UPDATES {
            return;
        }
        let excess = self.seen_updates.len() - MAX_SEEN_UPDATES;
        for key in self.seen_updates.drain(..excess) {
            self.index.remove(&key);
        }
    }
}
