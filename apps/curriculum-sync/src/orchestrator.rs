//! One check cycle: fetch, analyse, report, auto-apply, notify

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use doc_patcher::{apply_batch, instructions_for_gaps};
use gap_engine::{generate_report, AnalysisSession, GapAnalyzer};
use serde::Serialize;
use shared_types::audit::{AuditAction, AuditChain};
use shared_types::{EditInstruction, Gap, Priority, UpdateRecord, NEW_SECTION};
use tracing::{info, warn};

use crate::cache::SeenCache;
use crate::config::SyncConfig;
use crate::notify::{ConsoleNotifier, LogFileNotifier, Notifier};
use crate::sources::{fetch_all, Fetcher, JsonFileFetcher};
use crate::store::{DocumentStore, FileDocumentStore};

const ACTOR: &str = "curriculum-sync";

/// Gaps listed by title in a notification before eliding the rest
const NOTIFY_LISTED: usize = 5;

#[derive(Debug, Clone, Copy, Default)]
pub struct CheckOptions {
    /// Apply eligible edits even when `auto_apply` is off in the config
    pub apply: bool,
    /// Skip updates already seen in an earlier run
    pub only_new: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckSummary {
    pub timestamp: DateTime<Utc>,
    pub gaps_found: usize,
    pub high_priority: usize,
    pub auto_applied: usize,
    pub backup_path: Option<PathBuf>,
    pub notifications_sent: Vec<String>,
    pub errors: Vec<String>,
    pub report: String,
}

impl CheckSummary {
    fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            gaps_found: 0,
            high_priority: 0,
            auto_applied: 0,
            backup_path: None,
            notifications_sent: Vec::new(),
            errors: Vec::new(),
            report: String::new(),
        }
    }
}

struct ApplyResult {
    applied: Vec<EditInstruction>,
    backup_path: PathBuf,
}

struct StatePaths {
    cache: PathBuf,
    audit: PathBuf,
}

pub struct Orchestrator {
    config: SyncConfig,
    fetchers: Vec<Box<dyn Fetcher>>,
    store: Box<dyn DocumentStore>,
    notifiers: Vec<Box<dyn Notifier>>,
    analyzer: GapAnalyzer,
    session: AnalysisSession,
    cache: SeenCache,
    audit: AuditChain,
    state: Option<StatePaths>,
}

impl Orchestrator {
    /// In-memory orchestrator; nothing is persisted besides the document.
    pub fn new(
        config: SyncConfig,
        fetchers: Vec<Box<dyn Fetcher>>,
        store: Box<dyn DocumentStore>,
        notifiers: Vec<Box<dyn Notifier>>,
    ) -> Self {
        let audit = AuditChain::new(&store.location());
        Self {
            analyzer: GapAnalyzer::new(config.analyzer),
            config,
            fetchers,
            store,
            notifiers,
            session: AnalysisSession::new(),
            cache: SeenCache::new(),
            audit,
            state: None,
        }
    }

    /// Wire feeds, file store and notifiers from config, restoring the
    /// seen-update cache and audit log from `state_dir`.
    pub fn from_config(config: SyncConfig) -> anyhow::Result<Self> {
        let fetchers: Vec<Box<dyn Fetcher>> = config
            .feeds
            .iter()
            .map(|feed| {
                let fetcher = JsonFileFetcher::new(feed.source, &feed.path);
                let fetcher = match &feed.name {
                    Some(name) => fetcher.with_name(name),
                    None => fetcher,
                };
                Box::new(fetcher) as Box<dyn Fetcher>
            })
            .collect();

        let store = Box::new(FileDocumentStore::new(&config.document_path, config.max_backups));

        let mut notifiers: Vec<Box<dyn Notifier>> = Vec::new();
        if config.notify.console {
            notifiers.push(Box::new(ConsoleNotifier));
        }
        if config.notify.log_file {
            notifiers.push(Box::new(LogFileNotifier::new(config.notification_log_path())));
        }

        let state = StatePaths {
            cache: config.cache_path(),
            audit: config.audit_path(),
        };
        let cache = SeenCache::load(&state.cache);
        let audit = load_audit(&state.audit)?;

        let mut orchestrator = Self::new(config, fetchers, store, notifiers);
        orchestrator.cache = cache;
        if let Some(audit) = audit {
            orchestrator.audit = audit;
        }
        orchestrator.state = Some(state);
        Ok(orchestrator)
    }

    pub fn audit(&self) -> &AuditChain {
        &self.audit
    }

    pub fn cache(&self) -> &SeenCache {
        &self.cache
    }

    pub async fn run_check(&mut self, options: CheckOptions) -> CheckSummary {
        let now = Utc::now();
        let mut summary = CheckSummary::new(now);

        let fetched = fetch_all(&self.fetchers, self.config.days_back).await;
        summary.errors.extend(fetched.errors);

        let updates: Vec<Arc<UpdateRecord>> = fetched
            .updates
            .iter()
            .filter(|u| !(options.only_new && self.cache.is_seen(u)))
            .cloned()
            .map(Arc::new)
            .collect();

        let document = match self.store.load() {
            Ok(Some(text)) => Some(text),
            Ok(None) => {
                summary
                    .errors
                    .push(format!("Document not found: {}", self.store.location()));
                None
            }
            Err(err) => {
                summary.errors.push(err.to_string());
                None
            }
        };

        let outcome = self
            .analyzer
            .analyze(&mut self.session, &updates, document.as_deref());
        let gaps = outcome.gaps;

        summary.gaps_found = gaps.len();
        summary.high_priority = gaps.iter().filter(|g| g.priority == Priority::High).count();
        summary.report = generate_report(&gaps, &summary.errors, now);

        self.audit.append(
            AuditAction::AnalysisRun {
                updates_seen: updates.len() as u32,
                gaps_found: gaps.len() as u32,
            },
            ACTOR,
            document.as_deref().unwrap_or_default(),
            None,
        );

        let notable: Vec<&Gap> = gaps
            .iter()
            .filter(|g| g.priority.meets(self.config.min_priority))
            .collect();

        if notable.is_empty() {
            info!(
                threshold = %self.config.min_priority,
                "No gaps above threshold, skipping notification"
            );
        } else {
            let mut applied = None;
            if self.config.auto_apply || options.apply {
                match document.as_deref() {
                    Some(text) => applied = self.auto_apply(&notable, text, now, &mut summary),
                    None => summary
                        .errors
                        .push("Auto-apply skipped: no document loaded".to_string()),
                }
            }
            self.send_notifications(&notable, applied.as_ref(), &mut summary)
                .await;
        }

        self.cache.mark_seen(&fetched.updates, now);
        if let Err(err) = self.persist_state() {
            warn!(error = %format!("{:#}", err), "Failed to persist state");
            summary.errors.push(format!("{:#}", err));
        }

        info!(
            gaps = summary.gaps_found,
            high = summary.high_priority,
            applied = summary.auto_applied,
            errors = summary.errors.len(),
            "Check complete"
        );
        summary
    }

    /// Back up, apply eligible edits in order, then save once.
    ///
    /// If the backup fails nothing is written. Edits that fail are recorded
    /// and skipped.
    fn auto_apply(
        &mut self,
        gaps: &[&Gap],
        text: &str,
        now: DateTime<Utc>,
        summary: &mut CheckSummary,
    ) -> Option<ApplyResult> {
        let eligible: Vec<Gap> = gaps
            .iter()
            .filter(|g| g.priority.meets(self.config.auto_apply_priority))
            .take(self.config.auto_apply_max_per_run)
            .map(|g| (*g).clone())
            .collect();
        let instructions = instructions_for_gaps(&eligible);
        if instructions.is_empty() {
            return None;
        }

        let backup_path = match self.store.backup() {
            Ok(path) => path,
            Err(err) => {
                let reason = format!("Failed to create backup, aborting auto-apply: {}", err);
                warn!(error = %err, "Backup failed, auto-apply aborted");
                self.audit.append(
                    AuditAction::AutoApplyAborted {
                        reason: reason.clone(),
                    },
                    ACTOR,
                    text,
                    None,
                );
                summary.errors.push(reason);
                return None;
            }
        };
        summary.backup_path = Some(backup_path.clone());
        self.audit.append(
            AuditAction::BackupCreated {
                path: backup_path.display().to_string(),
            },
            ACTOR,
            text,
            None,
        );

        let outcome = apply_batch(text, &instructions);
        for (instruction, err) in &outcome.failures {
            summary
                .errors
                .push(format!("Failed: {}: {}", instruction.title, err));
            self.audit.append(
                AuditAction::EditFailed {
                    title: instruction.title.clone(),
                    error: err.to_string(),
                },
                ACTOR,
                text,
                None,
            );
        }

        if !outcome.changed() {
            return None;
        }

        if let Err(err) = self.store.save(&outcome.text) {
            summary
                .errors
                .push(format!("Failed to save curriculum after applying updates: {}", err));
            return None;
        }

        for instruction in &outcome.applied {
            self.audit.append(
                AuditAction::EditApplied {
                    section_key: instruction.section_key,
                    action: instruction.action,
                    title: instruction.title.clone(),
                },
                ACTOR,
                &outcome.text,
                Some(instruction.reason.clone()),
            );
            let title: String = instruction.title.chars().take(50).collect();
            self.cache.mark_applied(
                format!("auto::{}", title),
                format!("{} ({})", section_label(instruction), instruction.action),
                now,
            );
        }
        self.audit
            .append(AuditAction::DocumentSaved, ACTOR, &outcome.text, None);

        summary.auto_applied = outcome.applied.len();
        info!(
            applied = outcome.applied.len(),
            document = %self.store.location(),
            "Auto-applied updates"
        );
        Some(ApplyResult {
            applied: outcome.applied,
            backup_path,
        })
    }

    async fn send_notifications(
        &self,
        gaps: &[&Gap],
        applied: Option<&ApplyResult>,
        summary: &mut CheckSummary,
    ) {
        let (title, body) = match applied {
            Some(result) => applied_message(result, &self.store.location(), gaps),
            None => attention_message(gaps),
        };

        for notifier in &self.notifiers {
            match notifier.notify(&title, &body).await {
                Ok(()) => summary.notifications_sent.push(notifier.name().to_string()),
                Err(err) => {
                    warn!(notifier = notifier.name(), error = %err, "Notification failed");
                    summary
                        .errors
                        .push(format!("{} notification failed: {:#}", notifier.name(), err));
                }
            }
        }
    }

    fn persist_state(&self) -> anyhow::Result<()> {
        let Some(state) = &self.state else {
            return Ok(());
        };
        self.cache.save(&state.cache)?;
        let json = self.audit.to_json().context("Failed to serialize audit log")?;
        std::fs::write(&state.audit, json)
            .with_context(|| format!("Failed to write audit log: {}", state.audit.display()))
    }
}

fn load_audit(path: &Path) -> anyhow::Result<Option<AuditChain>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read audit log: {}", path.display()))?;
    let chain = AuditChain::from_json(&raw)
        .with_context(|| format!("Malformed audit log: {}", path.display()))?;
    chain
        .verify()
        .with_context(|| format!("Audit log failed verification: {}", path.display()))?;
    Ok(Some(chain))
}

fn section_label(instruction: &EditInstruction) -> String {
    if instruction.section_key == NEW_SECTION {
        "Appendix".to_string()
    } else {
        format!("Week {}", instruction.section_key)
    }
}

fn suggestions(gaps: &[&Gap]) -> String {
    gaps.iter()
        .map(|g| g.suggestion.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn attention_message(gaps: &[&Gap]) -> (String, String) {
    let title = format!("Curriculum: {} update(s) need attention", gaps.len());

    let mut lines: Vec<String> = gaps
        .iter()
        .take(NOTIFY_LISTED)
        .map(|g| {
            let headline: String = g.update.title.chars().take(80).collect();
            format!("[{}] {}", g.priority.as_str().to_uppercase(), headline)
        })
        .collect();
    if gaps.len() > NOTIFY_LISTED {
        lines.push(format!("... and {} more", gaps.len() - NOTIFY_LISTED));
    }

    (title, format!("{}\n\n{}", lines.join("\n"), suggestions(gaps)))
}

fn applied_message(result: &ApplyResult, document: &str, gaps: &[&Gap]) -> (String, String) {
    let title = format!("Curriculum: {} update(s) applied", result.applied.len());

    let mut lines = vec![
        format!("File updated: {}", document),
        format!("Backup: {}", result.backup_path.display()),
        String::new(),
        "Changes made:".to_string(),
    ];
    for instruction in &result.applied {
        lines.push(format!(
            "  - [{}] {} ({}): {}",
            section_label(instruction),
            instruction.title,
            instruction.action,
            instruction.reason
        ));
    }

    (title, format!("{}\n\n{}", lines.join("\n"), suggestions(gaps)))
}
