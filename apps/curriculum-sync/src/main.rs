//! curriculum-sync binary
//!
//! Runs one check cycle against the configured feeds and curriculum file.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use curriculum_sync::{CheckOptions, Orchestrator, SyncConfig};
use shared_types::audit::AuditChain;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "curriculum-sync")]
#[command(version, about = "Detect curriculum gaps from product update feeds")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "curriculum-sync.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch, analyse, notify and optionally apply edits
    Check {
        /// Apply eligible edits even if auto_apply is disabled in the config
        #[arg(long)]
        apply: bool,

        /// Ignore updates seen by an earlier run
        #[arg(long)]
        only_new: bool,

        /// Print the summary as JSON instead of the markdown report
        #[arg(long)]
        json: bool,
    },
    /// Verify and print the audit log of applied edits
    Audit,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // stdout carries the report; logs go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting curriculum-sync v{}", env!("CARGO_PKG_VERSION"));
    let config = SyncConfig::load_or_default(&args.config)?;

    match args.command {
        Command::Check {
            apply,
            only_new,
            json,
        } => {
            let mut orchestrator = Orchestrator::from_config(config)?;
            let summary = orchestrator
                .run_check(CheckOptions { apply, only_new })
                .await;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", summary.report);
                if let Some(backup) = &summary.backup_path {
                    println!("Backup: {}", backup.display());
                }
            }
        }
        Command::Audit => {
            let path = config.audit_path();
            if !path.exists() {
                println!("No audit log at {}", path.display());
                return Ok(());
            }
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read audit log: {}", path.display()))?;
            let chain = AuditChain::from_json(&raw).context("Malformed audit log")?;
            chain.verify()?;
            for line in chain.summary() {
                println!("{}", line);
            }
            println!(
                "{} events, {} applied edits, chain intact",
                chain.events.len(),
                chain.applied_edits()
            );
        }
    }

    Ok(())
}
