#![warn(mismatched_lifetime_syntaxes)]
#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Database access for eavclean
//!
//! The reconcilers only see the [`ConfigStore`] and [`MediaStore`] traits.
//! This crate provides sqlx backed adapters for `SQLite` and `MySQL`; the
//! backend is chosen from the scheme of `database.url`.

pub mod mysql;
mod sql;
pub mod sqlite;
mod tables;

pub use mysql::{MySqlConfigStore, MySqlMediaStore};
pub use sql::Dialect;
pub use sqlite::{SqliteConfigStore, SqliteMediaStore};
pub use tables::TableNames;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use eavclean_config::DatabaseConfig;
use eavclean_errors::{Error, StorageError};
use eavclean_types::{ConfigPair, MediaFileRef};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Rows of the configuration table
///
/// Implementations compare values byte for byte: a count and the matching
/// delete must always address the same rows.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Distinct configuration paths across all scopes
    async fn list_distinct_paths(&self) -> Result<Vec<String>, Error>;

    /// Distinct `(path, value)` pairs stored at the default scope
    async fn list_distinct_default_scope_pairs(&self) -> Result<Vec<ConfigPair>, Error>;

    /// Number of rows in any scope with exactly this path and value
    async fn count_rows(&self, path: &str, value: &str) -> Result<u64, Error>;

    /// Delete rows with exactly this path and value outside `exclude_scope`
    async fn delete_rows(&self, path: &str, value: &str, exclude_scope: i64) -> Result<u64, Error>;

    /// Delete every row whose path is in `paths`, in any scope
    async fn delete_by_paths(&self, paths: &[String]) -> Result<u64, Error>;
}

/// Rows of the product media gallery tables
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Distinct non-null file values of gallery rows that are not orphaned
    async fn list_referenced_files(&self) -> Result<Vec<MediaFileRef>, Error>;

    /// Gallery rows whose `value_id` has no value row
    ///
    /// Always zero while the value table is empty.
    async fn count_orphaned_entity_rows(&self) -> Result<u64, Error>;

    /// Delete gallery rows whose value matches exactly one of `values`
    async fn delete_by_values(&self, values: &[MediaFileRef]) -> Result<u64, Error>;

    /// Delete the rows counted by [`MediaStore::count_orphaned_entity_rows`]
    async fn delete_orphaned_entity_rows(&self) -> Result<u64, Error>;
}

/// Supported database backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Sqlite,
    MySql,
}

impl Backend {
    /// Pick the backend from a database url
    ///
    /// # Errors
    ///
    /// Returns an error if the url scheme is not `sqlite`, `mysql` or `mariadb`.
    pub fn from_url(url: &str) -> Result<Self, Error> {
        let scheme = url.split_once(':').map_or(url, |(scheme, _)| scheme);
        match scheme.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "mysql" | "mariadb" => Ok(Self::MySql),
            other => Err(StorageError::UnsupportedBackend {
                scheme: other.to_string(),
            }
            .into()),
        }
    }
}

/// Both stores over one connection pool
#[derive(Clone)]
pub struct Stores {
    pub backend: Backend,
    pub config: Arc<dyn ConfigStore>,
    pub media: Arc<dyn MediaStore>,
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores")
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

/// Open the configuration and media stores described by `config`
///
/// # Errors
///
/// Returns an error if no url is configured, the scheme or table prefix is
/// invalid, or the connection fails.
pub async fn open_stores(config: &DatabaseConfig) -> Result<Stores, Error> {
    let url = config.require_url()?;
    let tables = TableNames::with_prefix(&config.table_prefix)?;
    let backend = Backend::from_url(url)?;
    let batch_size = config.delete_batch_size;

    tracing::debug!(?backend, prefix = %config.table_prefix, "opening stores");

    let stores = match backend {
        Backend::Sqlite => {
            let pool = sqlite::connect(url, config).await?;
            Stores {
                backend,
                config: Arc::new(SqliteConfigStore::new(pool.clone(), &tables, batch_size)),
                media: Arc::new(SqliteMediaStore::new(pool, &tables, batch_size)),
            }
        }
        Backend::MySql => {
            let pool = mysql::connect(url, config).await?;
            Stores {
                backend,
                config: Arc::new(MySqlConfigStore::new(pool.clone(), &tables, batch_size)),
                media: Arc::new(MySqlMediaStore::new(pool, &tables, batch_size)),
            }
        }
    };
    Ok(stores)
}

/// Create a new `SQLite` connection pool, creating the file if needed
///
/// # Errors
///
/// Returns an error if the database connection fails or configuration is invalid.
pub async fn create_pool(db_path: &Path) -> Result<SqlitePool, Error> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(30));

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|e| {
            StorageError::ConnectionFailed {
                backend: "sqlite".to_string(),
                message: e.to_string(),
            }
            .into()
        })
}

/// Create the platform tables eavclean works on in a `SQLite` database
///
/// # Errors
///
/// Returns an error if any migration fails to execute.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), Error> {
    sqlx::migrate!("./migrations").run(pool).await.map_err(|e| {
        StorageError::MigrationFailed {
            message: e.to_string(),
        }
        .into()
    })
}

/// `COUNT(*)` comes back signed from both drivers.
pub(crate) fn count_to_u64(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_url() {
        assert_eq!(
            Backend::from_url("sqlite://shop.db").unwrap(),
            Backend::Sqlite
        );
        assert_eq!(Backend::from_url("sqlite::memory:").unwrap(), Backend::Sqlite);
        assert_eq!(
            Backend::from_url("mysql://root@localhost/shop").unwrap(),
            Backend::MySql
        );
        assert_eq!(
            Backend::from_url("MariaDB://root@localhost/shop").unwrap(),
            Backend::MySql
        );
    }

    #[test]
    fn test_backend_rejects_unknown_scheme() {
        let err = Backend::from_url("postgres://localhost/shop").unwrap_err();
        assert!(matches!(
            err,
            Error::Storage(StorageError::UnsupportedBackend { ref scheme }) if scheme == "postgres"
        ));
    }

    #[tokio::test]
    async fn test_open_stores_requires_url() {
        let err = open_stores(&DatabaseConfig::default()).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Config(eavclean_errors::ConfigError::MissingField { ref field }) if field == "database.url"
        ));
    }

    #[test]
    fn test_count_to_u64() {
        assert_eq!(count_to_u64(7), 7);
        assert_eq!(count_to_u64(-1), 0);
    }
}
