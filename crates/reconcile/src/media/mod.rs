//! Product media reconciliation
//!
//! Compares the files below the product image root with the file values
//! referenced by the gallery tables. Files nobody references are deleted from
//! disk; rows whose file is gone are deleted from the database. Both sides are
//! compared case-insensitively, database deletes match exactly.

pub mod diff;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use eavclean_errors::Error;
use eavclean_events::{EventEmitter, EventSender, ReconcileEvent};
use eavclean_store::MediaStore;
use eavclean_types::{MediaFileRef, MediaReport, ReconcileDomain, RunPhase};

use crate::{FilesystemWalker, PhaseTracker};

/// Outcome of the per-file sweep
#[derive(Debug, Default)]
struct Sweep {
    file_count: u64,
    bytes_freed: u64,
    failures: Vec<MediaFileRef>,
}

/// Reconciler for product images
pub struct MediaReconciler {
    store: Arc<dyn MediaStore>,
    walker: Arc<dyn FilesystemWalker>,
    image_root: PathBuf,
    skip_dirs: Vec<String>,
    tx: Option<EventSender>,
}

impl MediaReconciler {
    /// `image_root` is the canonical `<media>/catalog/product` directory
    #[must_use]
    pub fn new(
        store: Arc<dyn MediaStore>,
        walker: Arc<dyn FilesystemWalker>,
        image_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            walker,
            image_root: image_root.into(),
            skip_dirs: vec![eavclean_config::constants::CACHE_DIR_NAME.to_string()],
            tx: None,
        }
    }

    /// Directory names whose subtrees are never considered
    #[must_use]
    pub fn with_skip_dirs(mut self, names: Vec<String>) -> Self {
        self.skip_dirs = names;
        self
    }

    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    #[must_use]
    pub fn image_root(&self) -> &Path {
        &self.image_root
    }

    /// Diff disk against the gallery tables and, unless `dry_run`, delete
    /// both sides of the difference
    ///
    /// Gallery rows without a value row are pruned first; the referenced
    /// file set never includes them, so a dry run reports the same diff a
    /// real run acts on. File deletion is best effort: failures are logged,
    /// announced and listed in `deletion_failures`.
    ///
    /// # Errors
    ///
    /// Returns an error if the image root cannot be read or a store call
    /// fails.
    pub async fn reconcile(&self, dry_run: bool) -> Result<MediaReport, Error> {
        let mut phases = PhaseTracker::start(ReconcileDomain::Media, dry_run, self.tx.clone());
        let result = self.run(&mut phases, dry_run).await;
        phases.finish(result)
    }

    async fn run(&self, phases: &mut PhaseTracker, dry_run: bool) -> Result<MediaReport, Error> {
        let orphaned_entity_rows = self.store.count_orphaned_entity_rows().await?;
        let in_database = diff::dedup(self.store.list_referenced_files().await?);
        let on_disk = self.files_on_disk()?;
        tracing::debug!(
            database = in_database.len(),
            disk = on_disk.len(),
            orphaned_entity_rows,
            "collected media references"
        );

        let files_to_delete = diff::difference(&on_disk, &in_database);
        let files_to_remove_from_db = diff::difference(&in_database, &on_disk);

        let mut report = MediaReport {
            dry_run,
            orphaned_entity_rows,
            ..MediaReport::default()
        };

        if dry_run {
            let sweep = self.sweep_files(&files_to_delete, true).await;
            report.file_count = sweep.file_count;
            report.bytes_freed = sweep.bytes_freed;
        } else {
            phases.advance(RunPhase::Applying)?;

            if orphaned_entity_rows > 0 {
                let rows = self.store.delete_orphaned_entity_rows().await?;
                self.emit_reconcile(ReconcileEvent::OrphanedGalleryRowsPruned { rows });
            }

            let sweep = self.sweep_files(&files_to_delete, false).await;
            report.file_count = sweep.file_count;
            report.bytes_freed = sweep.bytes_freed;
            report.deletion_failures = sweep.failures;

            if !files_to_remove_from_db.is_empty() {
                let rows = self.store.delete_by_values(&files_to_remove_from_db).await?;
                self.emit_reconcile(ReconcileEvent::GalleryRowsRemoved {
                    values: files_to_remove_from_db.len(),
                    rows,
                });
            }
        }

        phases.advance(RunPhase::Reporting)?;
        report.files_to_delete = files_to_delete;
        report.files_to_remove_from_db = files_to_remove_from_db;
        Ok(report)
    }

    /// Walk the image root into de-duplicated references
    fn files_on_disk(&self) -> Result<Vec<MediaFileRef>, Error> {
        let mut files = Vec::new();
        for entry in self.walker.list_files_under(&self.image_root)? {
            match entry {
                Ok(path) => {
                    if let Some(file) = diff::to_file_ref(&self.image_root, &path, &self.skip_dirs)
                    {
                        files.push(file);
                    }
                }
                Err(err) => tracing::warn!(%err, "skipping unreadable entry"),
            }
        }
        Ok(diff::dedup(files))
    }

    /// Check, measure and (unless `dry_run`) delete each file in turn
    ///
    /// A file is counted once its size is known. Files already gone when
    /// the sweep reaches them are skipped, including files removed by an
    /// earlier delete in the same sweep.
    async fn sweep_files(&self, files: &[MediaFileRef], dry_run: bool) -> Sweep {
        let mut sweep = Sweep::default();
        for file in files {
            let path = diff::resolve(&self.image_root, file);
            if !self.walker.exists(&path).await {
                continue;
            }
            let size = match self.walker.stat(&path).await {
                Ok(stat) => stat.size,
                Err(err) => {
                    tracing::warn!(file = %file, %err, "cannot stat file; skipping");
                    continue;
                }
            };
            sweep.file_count += 1;
            sweep.bytes_freed += size;

            if dry_run {
                continue;
            }
            match self.walker.delete(&path).await {
                Ok(()) => self.emit_file_removed(file.clone(), size),
                Err(err) => {
                    tracing::warn!(file = %file, %err, "failed to delete file");
                    self.emit_reconcile(ReconcileEvent::FileRemovalFailed {
                        file: file.clone(),
                        error: err.to_string(),
                    });
                    sweep.failures.push(file.clone());
                }
            }
        }
        sweep
    }
}

impl EventEmitter for MediaReconciler {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }
}
