//! TOML configuration for the sync run
//!
//! Every field has a default, so an empty file (or no file at all) gives a
//! working read-only setup that reports on `curriculum.md`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use gap_engine::AnalyzerConfig;
use serde::{Deserialize, Serialize};
use shared_types::{Priority, Source};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Only updates published within this many days are considered
    pub days_back: u32,
    /// Lowest priority that triggers a notification
    pub min_priority: Priority,
    pub auto_apply: bool,
    /// Lowest priority eligible for auto-apply
    pub auto_apply_priority: Priority,
    /// Safety cap on edits per run
    pub auto_apply_max_per_run: usize,
    pub max_backups: usize,
    pub document_path: PathBuf,
    /// Seen-update cache, audit log and notification log live here
    pub state_dir: PathBuf,
    pub feeds: Vec<FeedConfig>,
    pub analyzer: AnalyzerConfig,
    pub notify: NotifyConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            days_back: 7,
            min_priority: Priority::High,
            auto_apply: false,
            auto_apply_priority: Priority::High,
            auto_apply_max_per_run: 5,
            max_backups: 10,
            document_path: PathBuf::from("curriculum.md"),
            state_dir: PathBuf::from(".curriculum-sync"),
            feeds: Vec::new(),
            analyzer: AnalyzerConfig::default(),
            notify: NotifyConfig::default(),
        }
    }
}

impl SyncConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse TOML configuration")
    }

    /// Like [`SyncConfig::from_file`], but a missing file yields the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::info!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn cache_path(&self) -> PathBuf {
        self.state_dir.join("update_cache.json")
    }

    pub fn audit_path(&self) -> PathBuf {
        self.state_dir.join("audit.json")
    }

    pub fn notification_log_path(&self) -> PathBuf {
        self.state_dir.join("notifications.log")
    }
}

/// One exported feed: a JSON array of update records on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    pub source: Source,
    pub path: PathBuf,
    /// Display name used in warnings; defaults to the source tag
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    pub console: bool,
    pub log_file: bool,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            console: true,
            log_file: true,
        }
    }
}
