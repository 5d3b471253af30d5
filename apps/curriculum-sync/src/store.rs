//! Curriculum document persistence with timestamped backups

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(PathBuf),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Where the curriculum text lives. Writers must be serialized by the caller.
pub trait DocumentStore: Send + Sync {
    fn location(&self) -> String;

    /// `Ok(None)` when there is no document yet.
    fn load(&self) -> Result<Option<String>, StoreError>;

    fn save(&self, text: &str) -> Result<(), StoreError>;

    /// Copy the current document aside and return the copy's path.
    fn backup(&self) -> Result<PathBuf, StoreError>;
}

/// A markdown file on disk.
#[derive(Debug, Clone)]
pub struct FileDocumentStore {
    path: PathBuf,
    max_backups: usize,
}

impl FileDocumentStore {
    pub fn new(path: impl Into<PathBuf>, max_backups: usize) -> Self {
        Self {
            path: path.into(),
            max_backups,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn backup_prefix(&self) -> String {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{}.backup.", name)
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Backup named `<file>.backup.<YYYY-MM-DD-HHMMSS>`; a second backup in
    /// the same second gets a `-NN` suffix so nothing is overwritten.
    pub fn backup_at(&self, now: DateTime<Utc>) -> Result<PathBuf, StoreError> {
        if !self.path.is_file() {
            return Err(StoreError::NotFound(self.path.clone()));
        }

        let dir = self.parent_dir();
        let stem = format!("{}{}", self.backup_prefix(), now.format("%Y-%m-%d-%H%M%S"));
        let mut target = dir.join(&stem);
        let mut n = 1;
        while target.exists() {
            target = dir.join(format!("{}-{:02}", stem, n));
            n += 1;
        }

        fs::copy(&self.path, &target).map_err(|e| StoreError::io(&target, e))?;
        info!(backup = %target.display(), "Created curriculum backup");

        self.prune_backups()?;
        Ok(target)
    }

    /// Backups of this document, oldest first.
    pub fn backups(&self) -> Result<Vec<PathBuf>, StoreError> {
        let dir = self.parent_dir();
        let prefix = self.backup_prefix();
        let entries = fs::read_dir(&dir).map_err(|e| StoreError::io(&dir, e))?;

        let mut backups: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.file_name().to_string_lossy().starts_with(&prefix))
            .map(|entry| entry.path())
            .collect();
        backups.sort();
        Ok(backups)
    }

    fn prune_backups(&self) -> Result<(), StoreError> {
        let backups = self.backups()?;
        if backups.len() <= self.max_backups {
            return Ok(());
        }
        let excess = backups.len() - self.max_backups;
        for old in &backups[..excess] {
            fs::remove_file(old).map_err(|e| StoreError::io(old, e))?;
            debug!(backup = %old.display(), "Deleted old backup");
        }
        Ok(())
    }
}

impl DocumentStore for FileDocumentStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(&self.path, e)),
        }
    }

    /// Write to a sibling temp file, then rename over the original.
    fn save(&self, text: &str) -> Result<(), StoreError> {
        let dir = self.parent_dir();
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, text).map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| StoreError::io(&self.path, e))?;
        info!(path = %self.path.display(), chars = text.len(), "Saved curriculum");
        Ok(())
    }

    fn backup(&self) -> Result<PathBuf, StoreError> {
        self.backup_at(Utc::now())
    }
}
