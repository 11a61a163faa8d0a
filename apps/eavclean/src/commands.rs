//! Command execution

use eavclean_errors::UserFacingError;
use eavclean_events::{EventEmitter, EventSender};
use eavclean_types::{
    MediaReport, OrphanedPathReport, ReconcileDomain, ReconciliationReport, ScopeDuplicateReport,
};
use tracing::warn;

use crate::cli::Commands;
use crate::error::CliError;
use crate::setup::SystemSetup;

/// Result of one command, ready for rendering
#[derive(Debug)]
pub enum CommandResult {
    ConfigPath(OrphanedPathReport),
    ConfigScope(ScopeDuplicateReport),
    Media(MediaReport),
    All(Box<CombinedRun>),
}

/// Per-domain reports of the `all` command and their merged summary
#[derive(Debug, Default)]
pub struct CombinedRun {
    pub summary: ReconciliationReport,
    pub orphaned_paths: Option<OrphanedPathReport>,
    pub scope_duplicates: Option<ScopeDuplicateReport>,
    pub media: Option<MediaReport>,
}

impl CommandResult {
    /// Serialize the report for `--json`
    pub fn to_json(&self) -> serde_json::Result<String> {
        match self {
            Self::ConfigPath(report) => serde_json::to_string_pretty(report),
            Self::ConfigScope(report) => serde_json::to_string_pretty(report),
            Self::Media(report) => serde_json::to_string_pretty(report),
            Self::All(run) => serde_json::to_string_pretty(&run.summary),
        }
    }

    /// Whether every domain the command ran succeeded
    pub fn is_success(&self) -> bool {
        match self {
            Self::All(run) => run.summary.is_success(),
            _ => true,
        }
    }

    /// Domains of a combined run that failed
    pub fn failure_count(&self) -> usize {
        match self {
            Self::All(run) => run.summary.failures.len(),
            _ => 0,
        }
    }
}

/// Execute the specified command
pub async fn execute_command(
    setup: &SystemSetup,
    command: Commands,
    tx: EventSender,
) -> Result<CommandResult, CliError> {
    let dry_run = command.dry_run();
    match command {
        Commands::ConfigPath { exclude, .. } => {
            let reconciler = setup.config_reconciler(tx, true).await?;
            let report = reconciler.detect_orphaned_paths(dry_run, &exclude).await?;
            Ok(CommandResult::ConfigPath(report))
        }
        Commands::ConfigScope { .. } => {
            let reconciler = setup.config_reconciler(tx, false).await?;
            let report = reconciler.remove_scope_duplicates(dry_run).await?;
            Ok(CommandResult::ConfigScope(report))
        }
        Commands::Media { .. } => {
            let reconciler = setup.media_reconciler(tx).await?;
            let report = reconciler.reconcile(dry_run).await?;
            Ok(CommandResult::Media(report))
        }
        Commands::All { exclude, .. } => {
            let run = run_all(setup, tx, dry_run, &exclude).await;
            Ok(CommandResult::All(Box::new(run)))
        }
    }
}

/// Run the three cleanups one after another, recording failures
///
/// Each cleanup is announced as an operation; a failing one is reported
/// and the next one still runs.
async fn run_all(
    setup: &SystemSetup,
    tx: EventSender,
    dry_run: bool,
    exclude: &[String],
) -> CombinedRun {
    let mut run = CombinedRun {
        summary: ReconciliationReport::new(dry_run),
        ..CombinedRun::default()
    };

    tx.emit_operation_started(ReconcileDomain::ConfigPaths.to_string());
    let orphaned = match setup.config_reconciler(tx.clone(), true).await {
        Ok(reconciler) => reconciler
            .detect_orphaned_paths(dry_run, exclude)
            .await
            .map_err(CliError::from),
        Err(err) => Err(err),
    };
    match orphaned {
        Ok(report) => {
            tx.emit_operation_completed(ReconcileDomain::ConfigPaths.to_string(), true);
            run.summary.record_orphaned_paths(&report);
            run.orphaned_paths = Some(report);
        }
        Err(err) => record_failure(&tx, &mut run.summary, ReconcileDomain::ConfigPaths, &err),
    }

    tx.emit_operation_started(ReconcileDomain::ConfigScopes.to_string());
    let scopes = match setup.config_reconciler(tx.clone(), false).await {
        Ok(reconciler) => reconciler
            .remove_scope_duplicates(dry_run)
            .await
            .map_err(CliError::from),
        Err(err) => Err(err),
    };
    match scopes {
        Ok(report) => {
            tx.emit_operation_completed(ReconcileDomain::ConfigScopes.to_string(), true);
            run.summary.record_scope_duplicates(&report);
            run.scope_duplicates = Some(report);
        }
        Err(err) => record_failure(&tx, &mut run.summary, ReconcileDomain::ConfigScopes, &err),
    }

    tx.emit_operation_started(ReconcileDomain::Media.to_string());
    let media = match setup.media_reconciler(tx.clone()).await {
        Ok(reconciler) => reconciler.reconcile(dry_run).await.map_err(CliError::from),
        Err(err) => Err(err),
    };
    match media {
        Ok(report) => {
            tx.emit_operation_completed(ReconcileDomain::Media.to_string(), true);
            run.summary.record_media(&report);
            run.media = Some(report);
        }
        Err(err) => record_failure(&tx, &mut run.summary, ReconcileDomain::Media, &err),
    }

    run
}

fn record_failure(
    tx: &EventSender,
    summary: &mut ReconciliationReport,
    domain: ReconcileDomain,
    err: &CliError,
) {
    warn!(domain = %domain, error = %err, "cleanup failed; continuing with the next one");
    let message = match err {
        CliError::Run(inner) => inner.user_message().into_owned(),
        other => other.to_string(),
    };
    tx.emit_operation_failed(domain.to_string(), message.clone());
    summary.record_failure(domain, message);
}
