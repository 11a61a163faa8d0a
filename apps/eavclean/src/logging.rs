//! Structured logging integration for events

use eavclean_events::{AppEvent, GeneralEvent, ReconcileEvent};
use tracing::{debug, error, info, warn};

/// Log an event through tracing with structured fields
pub fn log_event_with_tracing(event: &AppEvent) {
    let target = event.log_target();
    match event {
        AppEvent::General(general) => match general {
            GeneralEvent::Warning { message, context } => {
                warn!(target: "eavclean::events", event_target = target, context = ?context, "{message}");
            }
            GeneralEvent::OperationStarted { operation } => {
                info!(target: "eavclean::events", operation = %operation, "Operation started");
            }
            GeneralEvent::OperationCompleted { operation, success } => {
                info!(target: "eavclean::events", operation = %operation, success, "Operation completed");
            }
            GeneralEvent::OperationFailed { operation, error } => {
                error!(target: "eavclean::events", operation = %operation, error = %error, "Operation failed");
            }
        },

        AppEvent::Reconcile(reconcile) => match reconcile {
            ReconcileEvent::Started { domain, dry_run } => {
                info!(target: "eavclean::events", domain = %domain, dry_run, "Cleanup started");
            }
            ReconcileEvent::PhaseChanged { domain, from, to } => {
                debug!(target: "eavclean::events", domain = %domain, from = %from, to = %to, "Phase changed");
            }
            ReconcileEvent::OrphanedPathFound { path } => {
                info!(target: "eavclean::events", path = %path, "Orphaned configuration path");
            }
            ReconcileEvent::OrphanedPathsRemoved { paths, rows } => {
                info!(target: "eavclean::events", paths, rows, "Orphaned configuration paths removed");
            }
            ReconcileEvent::ScopeDuplicateFound { path, value, rows } => {
                info!(target: "eavclean::events", path = %path, value = %value, rows, "Scope duplicate");
            }
            ReconcileEvent::ScopeDuplicatesRemoved { path, rows } => {
                info!(target: "eavclean::events", path = %path, rows, "Scope duplicates removed");
            }
            ReconcileEvent::OrphanedGalleryRowsPruned { rows } => {
                info!(target: "eavclean::events", rows, "Gallery rows without values removed");
            }
            ReconcileEvent::FileRemoved { file, bytes } => {
                debug!(target: "eavclean::events", file = %file, bytes, "File removed");
            }
            ReconcileEvent::FileRemovalFailed { file, error } => {
                warn!(target: "eavclean::events", file = %file, error = %error, "File removal failed");
            }
            ReconcileEvent::GalleryRowsRemoved { values, rows } => {
                info!(target: "eavclean::events", values, rows, "Gallery rows removed");
            }
            ReconcileEvent::Completed {
                domain,
                dry_run,
                duration_ms,
            } => {
                info!(target: "eavclean::events", domain = %domain, dry_run, duration_ms, "Cleanup completed");
            }
            ReconcileEvent::Failed { domain, failure } => {
                error!(
                    target: "eavclean::events",
                    domain = %domain,
                    code = ?failure.code,
                    retryable = failure.retryable,
                    hint = ?failure.hint,
                    "Cleanup failed: {}",
                    failure.message
                );
            }
        },
    }
}
