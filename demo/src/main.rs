//! Rotortrace demo CLI.
//!
//! Runs the audit core against a JSON file store so the ledger survives
//! between invocations. Seed some workshop activity, then query, aggregate,
//! revert, and export it.
//!
//! Usage:
//!   cargo run -p demo -- seed
//!   cargo run -p demo -- list --search rotor
//!   cargo run -p demo -- stats
//!   cargo run -p demo -- timeline
//!   cargo run -p demo -- revert <entry-id> --reason "wrong diagnosis"
//!   cargo run -p demo -- export --format csv

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use rotortrace_audit::{
    AuditService, ExportFormat, FileStore, StaticEnvironment, StaticIdentity, DEFAULT_PAGE_SIZE,
};
use rotortrace_contracts::action::{AuditAction, AuditLevel, EntityType};
use rotortrace_contracts::config::{AuditConfigUpdate, AuditLogConfig};
use rotortrace_contracts::entry::{AppendRequest, EntryId, FieldChange, ValueKind};
use rotortrace_contracts::error::AuditResult;
use rotortrace_contracts::filter::AuditLogFilter;

// ── CLI definition ────────────────────────────────────────────────────────────

/// Rotortrace: audit trail demo for a drone-repair workshop.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "Rotortrace audit core demo",
    long_about = "Exercises the Rotortrace audit core against a file-backed store:\n\
                  append, query, timeline, stats, compensating revert, and export."
)]
struct Cli {
    /// Path of the JSON file store.
    #[arg(long, default_value = "rotortrace-demo.json")]
    store: PathBuf,

    /// Optional TOML config file applied before the command runs.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Append a batch of representative workshop actions.
    Seed,
    /// List entries, newest first.
    List {
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
        /// Case-insensitive text search.
        #[arg(long)]
        search: Option<String>,
        /// Only entries that can still be reverted.
        #[arg(long)]
        revertible: bool,
    },
    /// Aggregate statistics over the full history.
    Stats,
    /// History grouped by calendar day.
    Timeline,
    /// Compensate a previously recorded entry.
    Revert {
        id: String,
        #[arg(long)]
        reason: String,
    },
    /// Export the history.
    Export {
        #[arg(long, default_value = "csv")]
        format: ExportFormat,
    },
    /// Show the effective configuration.
    ConfigShow,
    /// Update configuration fields.
    ConfigSet {
        #[arg(long)]
        retention_days: Option<u32>,
        #[arg(long)]
        min_level: Option<AuditLevel>,
        #[arg(long)]
        enabled: Option<bool>,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug to watch the gate pipeline and store writes.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> AuditResult<()> {
    let identity = Arc::new(StaticIdentity::new("u-demo", "Demo Operator", "admin"));
    let store = Arc::new(FileStore::new(&cli.store));

    let audit = AuditService::open(identity, store)?
        .with_environment(Arc::new(StaticEnvironment::new("rotortrace-demo-cli/0.1")));

    if let Some(path) = &cli.config {
        let config = AuditLogConfig::from_file(path)?;
        audit.replace_config(config)?;
    }

    match cli.command {
        Command::Seed => seed(&audit),
        Command::List {
            page,
            page_size,
            search,
            revertible,
        } => list(&audit, page, page_size, search, revertible),
        Command::Stats => show_stats(&audit),
        Command::Timeline => show_timeline(&audit),
        Command::Revert { id, reason } => do_revert(&audit, id, &reason),
        Command::Export { format } => do_export(&audit, format),
        Command::ConfigShow => {
            let config = audit.get_config();
            println!("{:#?}", config);
            Ok(())
        }
        Command::ConfigSet {
            retention_days,
            min_level,
            enabled,
        } => {
            let merged = audit.update_config(AuditConfigUpdate {
                retention_days,
                min_level,
                enabled,
                ..AuditConfigUpdate::default()
            })?;
            println!("{:#?}", merged);
            Ok(())
        }
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn seed(audit: &AuditService) -> AuditResult<()> {
    let created = audit.append(
        AppendRequest::new(AuditAction::RepairCreated, "Created repair #42 (DJI Mavic 3)")
            .entity("42", EntityType::Repair),
    )?;

    let diagnosed = audit.append(
        AppendRequest::new(AuditAction::StateChanged, "Repair #42: received -> diagnosed")
            .entity("42", EntityType::Repair)
            .changes(vec![FieldChange {
                field: "state".to_string(),
                old_value: json!("received"),
                new_value: json!("diagnosed"),
                kind: ValueKind::String,
            }])
            .revertible(true),
    )?;

    audit.append(
        AppendRequest::new(AuditAction::PartAdded, "Added rotor arm (left front) to repair #42")
            .entity("42", EntityType::Repair)
            .revertible(true),
    )?;

    audit.append(
        AppendRequest::new(AuditAction::BudgetApproved, "Client approved budget #17 for repair #42")
            .entity("17", EntityType::Budget)
            .level(AuditLevel::Warning),
    )?;

    audit.append(
        AppendRequest::new(AuditAction::FileUploaded, "Uploaded flight log dump for repair #42")
            .entity("42", EntityType::Repair),
    )?;

    println!("Seeded 5 entries.");
    println!("  first entry id:      {}", created.id);
    println!("  revertible entry id: {}", diagnosed.id);
    Ok(())
}

fn list(
    audit: &AuditService,
    page: usize,
    page_size: usize,
    search: Option<String>,
    revertible: bool,
) -> AuditResult<()> {
    let filter = AuditLogFilter {
        search_text: search,
        revertible_only: revertible,
        ..AuditLogFilter::default()
    };
    let result = audit.get_logs(Some(&filter), page, page_size)?;

    println!(
        "Page {} ({} of {} entries, more: {})",
        result.page,
        result.logs.len(),
        result.total,
        result.has_more
    );
    for entry in &result.logs {
        let marker = match (&entry.reverted_by, entry.revertible) {
            (Some(_), _) => "reverted",
            (None, true) => "revertible",
            (None, false) => "-",
        };
        println!(
            "  {}  [{}] {:10} {:12} {}  ({})",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.level,
            entry.category,
            marker,
            entry.description,
            entry.id
        );
    }
    Ok(())
}

fn show_stats(audit: &AuditService) -> AuditResult<()> {
    let stats = audit.get_stats(None)?;

    println!("Total entries: {}", stats.total);
    println!("Window: {} .. {}", stats.from, stats.to);
    println!("By category:");
    for (category, count) in &stats.by_category {
        println!("  {:14} {}", category.to_string(), count);
    }
    println!("By level:");
    for (level, count) in &stats.by_level {
        println!("  {:14} {}", level.to_string(), count);
    }
    println!("Top actors:");
    for actor in &stats.top_actors {
        println!("  {} ({}): {}", actor.user_name, actor.user_id, actor.count);
    }
    println!("Top actions:");
    for action in &stats.top_actions {
        println!("  {:24} {}", action.action.to_string(), action.count);
    }
    Ok(())
}

fn show_timeline(audit: &AuditService) -> AuditResult<()> {
    for group in audit.get_timeline(None)? {
        println!("{} ({} entries)", group.date, group.logs.len());
        for entry in &group.logs {
            println!(
                "  {}  {}",
                entry.timestamp.format("%H:%M:%S"),
                entry.description
            );
        }
    }
    Ok(())
}

fn do_revert(audit: &AuditService, id: String, reason: &str) -> AuditResult<()> {
    let outcome = audit.revert(&EntryId(id), reason)?;
    if outcome.success {
        println!("{}", outcome.message);
        if let Some(entry) = outcome.revert_log {
            println!("  compensating entry: {}", entry.id);
        }
    } else {
        println!("Revert refused: {}", outcome.message);
    }
    Ok(())
}

fn do_export(audit: &AuditService, format: ExportFormat) -> AuditResult<()> {
    let payload = audit.export(None, format)?;
    // Both supported renderings are text; print to stdout for piping.
    print!("{}", String::from_utf8_lossy(&payload));
    Ok(())
}
