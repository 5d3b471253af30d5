//! Notification sinks

use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use tokio::io::AsyncWriteExt;

#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &'static str;

    async fn notify(&self, title: &str, body: &str) -> anyhow::Result<()>;
}

/// Prints the notification to stdout.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    fn name(&self) -> &'static str {
        "console"
    }

    async fn notify(&self, title: &str, body: &str) -> anyhow::Result<()> {
        println!("{}\n\n{}", title, body);
        Ok(())
    }
}

/// Appends every notification to a log file.
#[derive(Debug, Clone)]
pub struct LogFileNotifier {
    path: PathBuf,
}

impl LogFileNotifier {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Notifier for LogFileNotifier {
    fn name(&self) -> &'static str {
        "log_file"
    }

    async fn notify(&self, title: &str, body: &str) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open notification log: {}", self.path.display()))?;

        let entry = format!(
            "\n{}\n[{}] {}\n{}\n",
            "=".repeat(60),
            Utc::now().to_rfc3339(),
            title,
            body
        );
        file.write_all(entry.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
