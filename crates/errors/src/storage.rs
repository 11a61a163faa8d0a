//! Database error types for the configuration and media stores

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("failed to connect to {backend} database: {message}")]
    ConnectionFailed { backend: String, message: String },

    #[error("query failed: {message}")]
    QueryFailed { message: String },

    #[error("unsupported database url scheme: {scheme}")]
    UnsupportedBackend { scheme: String },

    #[error("migration failed: {message}")]
    MigrationFailed { message: String },

    #[error("connection pool timed out")]
    PoolTimedOut,
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => Self::PoolTimedOut,
            other => Self::QueryFailed {
                message: other.to_string(),
            },
        }
    }
}

impl UserFacingError for StorageError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::ConnectionFailed { .. } | Self::PoolTimedOut => {
                Some("Check database.url and that the database server is reachable.")
            }
            Self::UnsupportedBackend { .. } => {
                Some("Use a sqlite:// or mysql:// url for database.url.")
            }
            Self::QueryFailed { .. } => Some(
                "Deletions issued before the failure were not rolled back; rerun with --dry-run to inspect what is left.",
            ),
            Self::MigrationFailed { .. } => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::PoolTimedOut | Self::ConnectionFailed { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::ConnectionFailed { .. } => "storage.connection_failed",
            Self::QueryFailed { .. } => "storage.query_failed",
            Self::UnsupportedBackend { .. } => "storage.unsupported_backend",
            Self::MigrationFailed { .. } => "storage.migration_failed",
            Self::PoolTimedOut => "storage.pool_timed_out",
        };
        Some(code)
    }
}
