//! Report type definitions for reconciliation runs
//!
//! Reports are built fresh on every run and never persisted. Their content
//! does not depend on whether the run applied its changes; only `dry_run`
//! and `deletion_failures` can differ between the two modes.

use crate::{MediaFileRef, ReconcileDomain};
use serde::{Deserialize, Serialize};

/// Orphaned configuration paths found by a run
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrphanedPathReport {
    pub dry_run: bool,
    /// Orphaned paths in store order
    pub paths: Vec<String>,
}

/// Scope overrides that duplicate the default value
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeDuplicateReport {
    pub dry_run: bool,
    /// Rows removed (or that would be removed)
    pub removed_rows: u64,
    /// One line per duplicated `(path, value)` pair
    pub messages: Vec<String>,
}

/// Disk/database media diff
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaReport {
    pub dry_run: bool,
    /// Files on disk with no gallery row
    pub files_to_delete: Vec<MediaFileRef>,
    /// Gallery rows whose file is gone from disk
    pub files_to_remove_from_db: Vec<MediaFileRef>,
    /// Files that existed when the delete pass reached them
    pub file_count: u64,
    /// Sum of their sizes in bytes
    pub bytes_freed: u64,
    /// Gallery rows with no value row
    pub orphaned_entity_rows: u64,
    /// Files whose removal failed; always empty on dry runs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deletion_failures: Vec<MediaFileRef>,
}

impl MediaReport {
    /// Freed space in megabytes, rounded to two decimals for display.
    #[must_use]
    pub fn megabytes_freed(&self) -> String {
        #[allow(clippy::cast_precision_loss)]
        let mb = self.bytes_freed as f64 / 1024.0 / 1024.0;
        format!("{mb:.2}")
    }
}

/// A domain that failed during a combined run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainFailure {
    pub domain: ReconcileDomain,
    pub message: String,
}

/// Combined result of running every reconciler once
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    pub dry_run: bool,
    pub orphaned_paths: Vec<String>,
    pub scope_duplicates_removed: u64,
    pub scope_messages: Vec<String>,
    pub files_deleted: Vec<MediaFileRef>,
    pub bytes_freed: u64,
    pub db_rows_removed: Vec<MediaFileRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<DomainFailure>,
}

impl ReconciliationReport {
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    pub fn record_orphaned_paths(&mut self, report: &OrphanedPathReport) {
        self.orphaned_paths.clone_from(&report.paths);
    }

    pub fn record_scope_duplicates(&mut self, report: &ScopeDuplicateReport) {
        self.scope_duplicates_removed = report.removed_rows;
        self.scope_messages.clone_from(&report.messages);
    }

    pub fn record_media(&mut self, report: &MediaReport) {
        self.files_deleted.clone_from(&report.files_to_delete);
        self.bytes_freed = report.bytes_freed;
        self.db_rows_removed.clone_from(&report.files_to_remove_from_db);
    }

    pub fn record_failure(&mut self, domain: ReconcileDomain, message: impl Into<String>) {
        self.failures.push(DomainFailure {
            domain,
            message: message.into(),
        });
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}
