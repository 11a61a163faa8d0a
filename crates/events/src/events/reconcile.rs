use eavclean_types::{MediaFileRef, ReconcileDomain, RunPhase};
use serde::{Deserialize, Serialize};

use super::FailureContext;

/// Events emitted by the reconcilers while a run progresses.
///
/// Removal events are emitted as each deletion lands so that a consumer can
/// show what was removed even when a later step fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReconcileEvent {
    /// A run started
    Started {
        domain: ReconcileDomain,
        dry_run: bool,
    },

    /// The run moved to another phase
    PhaseChanged {
        domain: ReconcileDomain,
        from: RunPhase,
        to: RunPhase,
    },

    /// A configuration path has no declared schema entry
    OrphanedPathFound { path: String },

    /// Rows for orphaned paths were deleted
    OrphanedPathsRemoved { paths: usize, rows: u64 },

    /// A default-scope pair has redundant overrides
    ScopeDuplicateFound {
        path: String,
        value: String,
        rows: u64,
    },

    /// Redundant overrides for one pair were deleted
    ScopeDuplicatesRemoved { path: String, rows: u64 },

    /// Gallery rows without a value row were deleted
    OrphanedGalleryRowsPruned { rows: u64 },

    /// A file on disk was deleted
    FileRemoved { file: MediaFileRef, bytes: u64 },

    /// A file could not be deleted; the run continues
    FileRemovalFailed { file: MediaFileRef, error: String },

    /// Gallery rows referencing missing files were deleted
    GalleryRowsRemoved { values: usize, rows: u64 },

    /// A run finished
    Completed {
        domain: ReconcileDomain,
        dry_run: bool,
        duration_ms: u64,
    },

    /// A run failed; deletions announced before this event stay applied
    Failed {
        domain: ReconcileDomain,
        failure: FailureContext,
    },
}
