#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for async communication in eavclean
//!
//! Reconcilers never print. Everything a user sees about a run in progress
//! travels as an [`AppEvent`] to the CLI, which renders it and forwards it to
//! tracing.

pub mod events;
pub use events::{AppEvent, FailureContext, GeneralEvent, ReconcileEvent};

use eavclean_types::{MediaFileRef, ReconcileDomain, RunPhase};
use tokio::sync::mpsc::UnboundedSender;

/// Type alias for event sender using the `AppEvent` system
pub type EventSender = UnboundedSender<AppEvent>;

/// Type alias for event receiver using the `AppEvent` system
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<AppEvent>;

/// Create a new event channel with the `AppEvent` system
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// The unified trait for emitting events throughout eavclean
///
/// Implemented for a raw `EventSender` and for any struct that may hold one.
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    /// Emit an event through this emitter
    fn emit(&self, event: AppEvent) {
        if let Some(sender) = self.event_sender() {
            // Ignore send errors - if receiver is dropped, we just continue
            let _ = sender.send(event);
        }
    }

    /// Emit a warning event
    fn emit_warning(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::warning(message)));
    }

    /// Emit a warning event with context
    fn emit_warning_with_context(&self, message: impl Into<String>, context: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::warning_with_context(
            message, context,
        )));
    }

    /// Emit an operation started event
    fn emit_operation_started(&self, operation: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::OperationStarted {
            operation: operation.into(),
        }));
    }

    /// Emit an operation completed event
    fn emit_operation_completed(&self, operation: impl Into<String>, success: bool) {
        self.emit(AppEvent::General(GeneralEvent::OperationCompleted {
            operation: operation.into(),
            success,
        }));
    }

    /// Emit an operation failed event
    fn emit_operation_failed(&self, operation: impl Into<String>, error: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::OperationFailed {
            operation: operation.into(),
            error: error.into(),
        }));
    }

    /// Emit a reconciliation event
    fn emit_reconcile(&self, event: ReconcileEvent) {
        self.emit(AppEvent::Reconcile(event));
    }

    /// Emit a run started event
    fn emit_run_started(&self, domain: ReconcileDomain, dry_run: bool) {
        self.emit_reconcile(ReconcileEvent::Started { domain, dry_run });
    }

    /// Emit a phase change event
    fn emit_phase_changed(&self, domain: ReconcileDomain, from: RunPhase, to: RunPhase) {
        self.emit_reconcile(ReconcileEvent::PhaseChanged { domain, from, to });
    }

    /// Emit a file removed event
    fn emit_file_removed(&self, file: MediaFileRef, bytes: u64) {
        self.emit_reconcile(ReconcileEvent::FileRemoved { file, bytes });
    }

    /// Emit a run failed event
    fn emit_run_failed<E>(&self, domain: ReconcileDomain, error: &E)
    where
        E: eavclean_errors::UserFacingError + ?Sized,
    {
        self.emit_reconcile(ReconcileEvent::Failed {
            domain,
            failure: FailureContext::from_error(error),
        });
    }
}

impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}

impl EventEmitter for Option<EventSender> {
    fn event_sender(&self) -> Option<&EventSender> {
        self.as_ref()
    }
}
