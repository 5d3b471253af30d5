//! Tamper-evident log of automated curriculum edits

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

use crate::edit::EditAction;
use crate::gap::SectionKey;

/// Things the sync run does to the curriculum
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    AnalysisRun {
        updates_seen: u32,
        gaps_found: u32,
    },
    BackupCreated {
        path: String,
    },
    EditApplied {
        section_key: SectionKey,
        action: EditAction,
        title: String,
    },
    EditFailed {
        title: String,
        error: String,
    },
    DocumentSaved,
    AutoApplyAborted {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Chain broken at event {index}: expected prev {expected:?}, got {found:?}")]
pub struct ChainError {
    pub index: usize,
    pub expected: Option<String>,
    pub found: Option<String>,
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub event_id: String,
    pub timestamp: String,
    pub action: AuditAction,
    pub actor: String,
    /// SHA-256 of the document text at the time of the event.
    pub document_hash: String,
    pub previous_hash: Option<String>,
    pub details: Option<String>,
}

impl AuditEvent {
    pub fn new(
        action: AuditAction,
        actor: &str,
        document_hash: &str,
        previous_hash: Option<String>,
        details: Option<String>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now().to_rfc3339(),
            action,
            actor: actor.to_string(),
            document_hash: document_hash.to_string(),
            previous_hash,
            details,
        }
    }

    /// Hash used to link the next event
    pub fn compute_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.event_id.as_bytes());
        hasher.update(self.timestamp.as_bytes());
        hasher.update(format!("{:?}", self.action).as_bytes());
        hasher.update(self.actor.as_bytes());
        hasher.update(self.document_hash.as_bytes());
        if let Some(ref prev) = self.previous_hash {
            hasher.update(prev.as_bytes());
        }
        if let Some(ref details) = self.details {
            hasher.update(details.as_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

/// Hash-linked history of edits made to one curriculum file
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AuditChain {
    pub events: Vec<AuditEvent>,
    pub document_id: String,
    pub created_at: String,
}

impl AuditChain {
    pub fn new(document_id: &str) -> Self {
        Self {
            events: Vec::new(),
            document_id: document_id.to_string(),
            created_at: Utc::now().to_rfc3339(),
        }
    }

    pub fn last_hash(&self) -> Option<String> {
        self.events.last().map(|e| e.compute_hash())
    }

    /// Append an event linked to the current tail
    pub fn append(
        &mut self,
        action: AuditAction,
        actor: &str,
        document_text: &str,
        details: Option<String>,
    ) -> &AuditEvent {
        let previous_hash = self.last_hash();
        let event = AuditEvent::new(
            action,
            actor,
            &hash_text(document_text),
            previous_hash,
            details,
        );
        self.events.push(event);
        &self.events[self.events.len() - 1]
    }

    pub fn verify(&self) -> Result<(), ChainError> {
        let mut expected_prev: Option<String> = None;

        for (index, event) in self.events.iter().enumerate() {
            if event.previous_hash != expected_prev {
                return Err(ChainError {
                    index,
                    expected: expected_prev,
                    found: event.previous_hash.clone(),
                });
            }
            expected_prev = Some(event.compute_hash());
        }

        Ok(())
    }

    pub fn applied_edits(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e.action, AuditAction::EditApplied { .. }))
            .count()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// One line per event for display
    pub fn summary(&self) -> Vec<String> {
        self.events
            .iter()
            .map(|e| {
                let day = e.timestamp.split('T').next().unwrap_or(&e.timestamp);
                match &e.action {
                    AuditAction::EditApplied {
                        section_key,
                        action,
                        title,
                    } => format!("[{}] {} {} -> section {}: {}", day, e.actor, action, section_key, title),
                    other => format!("[{}] {} - {:?}", day, e.actor, other),
                }
            })
            .collect()
    }
}

/// SHA-256 of document text, hex encoded
pub fn hash_text(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}
