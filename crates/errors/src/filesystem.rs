//! Filesystem error types for the media walk and file deletion

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum FilesystemError {
    #[error("image root {path} is not readable: {message}")]
    RootUnreadable { path: PathBuf, message: String },

    #[error("failed to walk {path}: {message}")]
    WalkFailed { path: PathBuf, message: String },

    #[error("failed to stat {path}: {message}")]
    StatFailed { path: PathBuf, message: String },

    #[error("failed to delete {path}: {message}")]
    DeleteFailed { path: PathBuf, message: String },
}

impl FilesystemError {
    #[must_use]
    pub fn stat_failed(path: &Path, err: &std::io::Error) -> Self {
        Self::StatFailed {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    #[must_use]
    pub fn delete_failed(path: &Path, err: &std::io::Error) -> Self {
        Self::DeleteFailed {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

impl UserFacingError for FilesystemError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::RootUnreadable { .. } => {
                Some("Check media.root points at the platform's pub/media directory.")
            }
            Self::DeleteFailed { .. } => {
                Some("Adjust filesystem permissions or rerun as the web server user.")
            }
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::DeleteFailed { .. } | Self::StatFailed { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::RootUnreadable { .. } => "filesystem.root_unreadable",
            Self::WalkFailed { .. } => "filesystem.walk_failed",
            Self::StatFailed { .. } => "filesystem.stat_failed",
            Self::DeleteFailed { .. } => "filesystem.delete_failed",
        };
        Some(code)
    }
}
