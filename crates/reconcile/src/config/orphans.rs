//! Orphaned configuration path detection

use eavclean_config::{ExclusionList, ValidatorErrorPolicy};
use eavclean_errors::{Error, ReconcileError};
use eavclean_events::{EventEmitter, ReconcileEvent};
use eavclean_types::{OrphanedPathReport, ReconcileDomain, RunPhase};

use super::ConfigReconciler;
use crate::PhaseTracker;

impl ConfigReconciler {
    /// Find stored paths the schema does not declare and, unless `dry_run`,
    /// delete their rows in every scope
    ///
    /// `extra_exclusions` are protected for this run only, in addition to the
    /// configured list. The report lists orphaned paths in store order and is
    /// identical for dry and real runs.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails, or if the validator fails for a
    /// reason other than rejecting the path while the policy is `Abort`. No
    /// row has been deleted when a validator failure aborts the run.
    pub async fn detect_orphaned_paths(
        &self,
        dry_run: bool,
        extra_exclusions: &[String],
    ) -> Result<OrphanedPathReport, Error> {
        let mut phases =
            PhaseTracker::start(ReconcileDomain::ConfigPaths, dry_run, self.tx.clone());
        let result = self
            .run_orphaned_paths(&mut phases, dry_run, extra_exclusions)
            .await;
        phases.finish(result)
    }

    async fn run_orphaned_paths(
        &self,
        phases: &mut PhaseTracker,
        dry_run: bool,
        extra_exclusions: &[String],
    ) -> Result<OrphanedPathReport, Error> {
        let exclusions = self
            .exclusions
            .merged_with(extra_exclusions.iter().cloned());
        let paths = self.store.list_distinct_paths().await?;
        tracing::debug!(paths = paths.len(), "checking configuration paths");

        let mut orphaned = Vec::new();
        for path in paths {
            if self.is_orphaned(&path, &exclusions)? {
                self.emit_reconcile(ReconcileEvent::OrphanedPathFound { path: path.clone() });
                orphaned.push(path);
            }
        }

        if !dry_run && !orphaned.is_empty() {
            phases.advance(RunPhase::Applying)?;
            let rows = self.store.delete_by_paths(&orphaned).await?;
            self.emit_reconcile(ReconcileEvent::OrphanedPathsRemoved {
                paths: orphaned.len(),
                rows,
            });
        }

        phases.advance(RunPhase::Reporting)?;
        Ok(OrphanedPathReport {
            dry_run,
            paths: orphaned,
        })
    }

    fn is_orphaned(&self, path: &str, exclusions: &ExclusionList) -> Result<bool, Error> {
        if exclusions.contains(path) {
            return Ok(false);
        }

        match self.validator.is_valid(path) {
            Ok(valid) => Ok(!valid),
            Err(err) if err.is_rejection() => {
                tracing::trace!(path, %err, "validator rejected path");
                Ok(true)
            }
            Err(err) => match self.policy {
                ValidatorErrorPolicy::Abort => Err(ReconcileError::ValidatorFailed {
                    path: path.to_string(),
                    reason: err.to_string(),
                }
                .into()),
                ValidatorErrorPolicy::TreatAsInvalid => {
                    tracing::warn!(path, %err, "validator failed; treating path as orphaned");
                    self.emit_warning_with_context(
                        format!("validator failed for {path}; treating it as orphaned"),
                        err.to_string(),
                    );
                    Ok(true)
                }
            },
        }
    }
}
