//! Scheduled curriculum sync
//!
//! Fetches updates from configured feeds, runs gap analysis against the
//! curriculum file, notifies, and optionally applies high-priority edits
//! behind a verified backup.

pub mod cache;
pub mod config;
pub mod notify;
pub mod orchestrator;
pub mod sources;
pub mod store;

pub use config::SyncConfig;
pub use orchestrator::{CheckOptions, CheckSummary, Orchestrator};
