//! Run lifecycle tracking

use std::time::Instant;

use eavclean_errors::{Error, ReconcileError};
use eavclean_events::{EventEmitter, EventSender, ReconcileEvent};
use eavclean_types::{ReconcileDomain, RunPhase};

/// Drives one run through its phases and reports each step as an event
///
/// Created in `Scanning` by [`PhaseTracker::start`]; a run ends with
/// [`PhaseTracker::finish`].
#[derive(Debug)]
pub struct PhaseTracker {
    domain: ReconcileDomain,
    dry_run: bool,
    phase: RunPhase,
    started: Instant,
    tx: Option<EventSender>,
}

impl PhaseTracker {
    /// Announce a run and enter `Scanning`
    #[must_use]
    pub fn start(domain: ReconcileDomain, dry_run: bool, tx: Option<EventSender>) -> Self {
        let mut tracker = Self {
            domain,
            dry_run,
            phase: RunPhase::Idle,
            started: Instant::now(),
            tx,
        };
        tracker.emit_run_started(domain, dry_run);
        tracker.set(RunPhase::Scanning);
        tracker
    }

    #[must_use]
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Move to `next`
    ///
    /// # Errors
    ///
    /// Returns an error if the lifecycle does not allow the transition.
    pub fn advance(&mut self, next: RunPhase) -> Result<(), Error> {
        if !self.phase.can_transition_to(next) {
            return Err(ReconcileError::InvalidTransition {
                from: self.phase.to_string(),
                to: next.to_string(),
            }
            .into());
        }
        self.set(next);
        Ok(())
    }

    /// Close the run: back to `Idle` on success, `Failed` otherwise
    ///
    /// # Errors
    ///
    /// Passes `result`'s error through, after announcing the failure.
    pub fn finish<T>(mut self, result: Result<T, Error>) -> Result<T, Error> {
        let result = result.and_then(|value| {
            if self.phase != RunPhase::Reporting {
                self.advance(RunPhase::Reporting)?;
            }
            self.advance(RunPhase::Idle)?;
            Ok(value)
        });

        match result {
            Ok(value) => {
                let duration_ms =
                    u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);
                self.emit_reconcile(ReconcileEvent::Completed {
                    domain: self.domain,
                    dry_run: self.dry_run,
                    duration_ms,
                });
                Ok(value)
            }
            Err(err) => {
                if self.phase.can_transition_to(RunPhase::Failed) {
                    self.set(RunPhase::Failed);
                }
                self.emit_run_failed(self.domain, &err);
                Err(err)
            }
        }
    }

    fn set(&mut self, next: RunPhase) {
        tracing::debug!(domain = %self.domain, from = %self.phase, to = %next, "phase change");
        self.emit_phase_changed(self.domain, self.phase, next);
        self.phase = next;
    }
}

impl EventEmitter for PhaseTracker {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eavclean_events::AppEvent;

    fn phases(rx: &mut eavclean_events::EventReceiver) -> Vec<RunPhase> {
        let mut seen = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let AppEvent::Reconcile(ReconcileEvent::PhaseChanged { to, .. }) = event {
                seen.push(to);
            }
        }
        seen
    }

    #[test]
    fn test_dry_run_lifecycle() {
        let (tx, mut rx) = eavclean_events::channel();
        let tracker = PhaseTracker::start(ReconcileDomain::Media, true, Some(tx));
        assert_eq!(tracker.phase(), RunPhase::Scanning);
        tracker.finish(Ok(())).unwrap();

        assert_eq!(
            phases(&mut rx),
            vec![RunPhase::Scanning, RunPhase::Reporting, RunPhase::Idle]
        );
    }

    #[test]
    fn test_apply_lifecycle() {
        let (tx, mut rx) = eavclean_events::channel();
        let mut tracker = PhaseTracker::start(ReconcileDomain::ConfigPaths, false, Some(tx));
        tracker.advance(RunPhase::Applying).unwrap();
        tracker.advance(RunPhase::Reporting).unwrap();
        tracker.finish(Ok(())).unwrap();

        assert_eq!(
            phases(&mut rx),
            vec![
                RunPhase::Scanning,
                RunPhase::Applying,
                RunPhase::Reporting,
                RunPhase::Idle
            ]
        );
    }

    #[test]
    fn test_illegal_transition_rejected() {
        let mut tracker = PhaseTracker::start(ReconcileDomain::Media, false, None);
        tracker.advance(RunPhase::Applying).unwrap();
        let err = tracker.advance(RunPhase::Scanning).unwrap_err();
        assert!(matches!(
            err,
            Error::Reconcile(ReconcileError::InvalidTransition { .. })
        ));
        assert_eq!(tracker.phase(), RunPhase::Applying);
    }

    #[test]
    fn test_failure_is_terminal_and_announced() {
        let (tx, mut rx) = eavclean_events::channel();
        let tracker = PhaseTracker::start(ReconcileDomain::ConfigScopes, false, Some(tx));
        let result: Result<(), Error> = tracker.finish(Err(Error::internal("boom")));
        assert!(result.is_err());

        let mut failed = false;
        let mut last_phase = None;
        while let Ok(event) = rx.try_recv() {
            match event {
                AppEvent::Reconcile(ReconcileEvent::Failed { .. }) => failed = true,
                AppEvent::Reconcile(ReconcileEvent::PhaseChanged { to, .. }) => {
                    last_phase = Some(to);
                }
                _ => {}
            }
        }
        assert!(failed);
        assert_eq!(last_phase, Some(RunPhase::Failed));
        assert!(RunPhase::Failed.is_terminal());
    }
}
