//! Scope override de-duplication

use eavclean_errors::Error;
use eavclean_events::{EventEmitter, ReconcileEvent};
use eavclean_types::{ReconcileDomain, RunPhase, ScopeDuplicateReport, DEFAULT_SCOPE_ID};

use super::ConfigReconciler;
use crate::PhaseTracker;

/// A default-scope pair stored more than once
#[derive(Debug)]
struct Duplicate {
    path: String,
    value: String,
    rows: u64,
}

impl ConfigReconciler {
    /// Remove rows outside the default scope whose value is byte-identical to
    /// the default-scope value of the same path
    ///
    /// `removed_rows` counts `rows - 1` per duplicated pair whether or not the
    /// run is a dry run. Default values that are `NULL` never match.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails. Pairs already deleted stay
    /// deleted and have been announced.
    pub async fn remove_scope_duplicates(
        &self,
        dry_run: bool,
    ) -> Result<ScopeDuplicateReport, Error> {
        let mut phases =
            PhaseTracker::start(ReconcileDomain::ConfigScopes, dry_run, self.tx.clone());
        let result = self.run_scope_duplicates(&mut phases, dry_run).await;
        phases.finish(result)
    }

    async fn run_scope_duplicates(
        &self,
        phases: &mut PhaseTracker,
        dry_run: bool,
    ) -> Result<ScopeDuplicateReport, Error> {
        let mut duplicates = Vec::new();
        for pair in self.store.list_distinct_default_scope_pairs().await? {
            let Some(value) = pair.value else {
                tracing::trace!(path = %pair.path, "skipping NULL default value");
                continue;
            };

            let rows = self.store.count_rows(&pair.path, &value).await?;
            if rows > 1 {
                self.emit_reconcile(ReconcileEvent::ScopeDuplicateFound {
                    path: pair.path.clone(),
                    value: value.clone(),
                    rows,
                });
                duplicates.push(Duplicate {
                    path: pair.path,
                    value,
                    rows,
                });
            }
        }

        if !dry_run && !duplicates.is_empty() {
            phases.advance(RunPhase::Applying)?;
            for duplicate in &duplicates {
                let rows = self
                    .store
                    .delete_rows(&duplicate.path, &duplicate.value, DEFAULT_SCOPE_ID)
                    .await?;
                self.emit_reconcile(ReconcileEvent::ScopeDuplicatesRemoved {
                    path: duplicate.path.clone(),
                    rows,
                });
            }
        }

        phases.advance(RunPhase::Reporting)?;
        Ok(ScopeDuplicateReport {
            dry_run,
            removed_rows: duplicates.iter().map(|d| d.rows - 1).sum(),
            messages: duplicates
                .iter()
                .map(|d| {
                    format!(
                        "Config path {} with value {} has {} entries; deleting non-default values",
                        d.path, d.value, d.rows
                    )
                })
                .collect(),
        })
    }
}
