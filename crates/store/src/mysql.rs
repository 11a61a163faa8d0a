//! `MySQL` adapters for the configuration and media stores

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use eavclean_config::DatabaseConfig;
use eavclean_errors::{Error, StorageError};
use eavclean_types::{ConfigPair, MediaFileRef};
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{MySql, MySqlPool, QueryBuilder, Row};

use crate::sql::{ConfigSql, Dialect, MediaSql};
use crate::{count_to_u64, ConfigStore, MediaStore, TableNames};

/// Connect to a `MySQL` or `MariaDB` server given as a `mysql:` url
///
/// # Errors
///
/// Returns an error if the url is invalid or the database cannot be opened.
pub async fn connect(url: &str, config: &DatabaseConfig) -> Result<MySqlPool, Error> {
    let options = MySqlConnectOptions::from_str(url).map_err(|e| connection_failed(&e))?;

    MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_with(options)
        .await
        .map_err(|e| connection_failed(&e))
}

fn connection_failed(err: &sqlx::Error) -> Error {
    StorageError::ConnectionFailed {
        backend: "mysql".to_string(),
        message: err.to_string(),
    }
    .into()
}

/// Bind `values` into `DELETE ... IN (...)` statements of at most
/// `batch_size` values each and return the total rows affected.
async fn delete_in_batches(
    pool: &MySqlPool,
    statement: &str,
    values: &[String],
    batch_size: usize,
) -> Result<u64, Error> {
    let mut removed = 0;
    for chunk in values.chunks(batch_size.max(1)) {
        let mut builder = QueryBuilder::<MySql>::new(statement);
        builder.push("(");
        let mut separated = builder.separated(", ");
        for value in chunk {
            separated.push_bind(value.as_str());
        }
        separated.push_unseparated(")");

        let result = builder.build().execute(pool).await?;
        removed += result.rows_affected();
    }
    Ok(removed)
}

/// Configuration table on `MySQL`
#[derive(Debug, Clone)]
pub struct MySqlConfigStore {
    pool: MySqlPool,
    sql: ConfigSql,
    batch_size: usize,
}

impl MySqlConfigStore {
    #[must_use]
    pub fn new(pool: MySqlPool, tables: &TableNames, batch_size: usize) -> Self {
        Self {
            pool,
            sql: ConfigSql::new(tables, Dialect::MySql),
            batch_size,
        }
    }
}

#[async_trait]
impl ConfigStore for MySqlConfigStore {
    async fn list_distinct_paths(&self) -> Result<Vec<String>, Error> {
        let rows = sqlx::query(&self.sql.distinct_paths)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(|row| row.get("path")).collect())
    }

    async fn list_distinct_default_scope_pairs(&self) -> Result<Vec<ConfigPair>, Error> {
        let rows = sqlx::query(&self.sql.default_scope_pairs)
            .bind(eavclean_types::DEFAULT_SCOPE_ID)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| ConfigPair {
                path: row.get("path"),
                value: row.get("value"),
            })
            .collect())
    }

    async fn count_rows(&self, path: &str, value: &str) -> Result<u64, Error> {
        let row = sqlx::query(&self.sql.count_rows)
            .bind(path)
            .bind(value)
            .fetch_one(&self.pool)
            .await?;
        Ok(count_to_u64(row.get("total")))
    }

    async fn delete_rows(&self, path: &str, value: &str, exclude_scope: i64) -> Result<u64, Error> {
        let result = sqlx::query(&self.sql.delete_rows)
            .bind(path)
            .bind(value)
            .bind(exclude_scope)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_by_paths(&self, paths: &[String]) -> Result<u64, Error> {
        delete_in_batches(&self.pool, &self.sql.delete_by_paths, paths, self.batch_size).await
    }
}

/// Gallery tables on `MySQL`
#[derive(Debug, Clone)]
pub struct MySqlMediaStore {
    pool: MySqlPool,
    sql: MediaSql,
    batch_size: usize,
}

impl MySqlMediaStore {
    #[must_use]
    pub fn new(pool: MySqlPool, tables: &TableNames, batch_size: usize) -> Self {
        Self {
            pool,
            sql: MediaSql::new(tables, Dialect::MySql),
            batch_size,
        }
    }
}

#[async_trait]
impl MediaStore for MySqlMediaStore {
    async fn list_referenced_files(&self) -> Result<Vec<MediaFileRef>, Error> {
        let rows = sqlx::query(&self.sql.referenced_files)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(|row| MediaFileRef::new(row.get::<String, _>("value")))
            .collect())
    }

    async fn count_orphaned_entity_rows(&self) -> Result<u64, Error> {
        let row = sqlx::query(&self.sql.count_orphaned_entities)
            .fetch_one(&self.pool)
            .await?;
        Ok(count_to_u64(row.get("total")))
    }

    async fn delete_by_values(&self, values: &[MediaFileRef]) -> Result<u64, Error> {
        let values: Vec<String> = values.iter().map(|v| v.as_str().to_string()).collect();
        delete_in_batches(&self.pool, &self.sql.delete_by_values, &values, self.batch_size).await
    }

    async fn delete_orphaned_entity_rows(&self) -> Result<u64, Error> {
        let result = sqlx::query(&self.sql.delete_orphaned_entities)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
