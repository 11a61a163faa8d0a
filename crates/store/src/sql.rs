//! SQL text for both backends
//!
//! The two backends share every statement except for how values are compared.
//! MySQL columns usually carry a case-insensitive collation, so reads go
//! through `utf8mb4_bin` and comparisons through `BINARY` to keep row counts
//! and deletions byte-exact, the same as SQLite's default `BINARY` collation.

use crate::TableNames;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Sqlite,
    MySql,
}

impl Dialect {
    /// Column expression compared byte for byte.
    fn exact(self, column: &str) -> String {
        match self {
            Self::Sqlite => column.to_string(),
            Self::MySql => format!("BINARY {column}"),
        }
    }

    /// Column expression selected with a binary collation.
    fn select_exact(self, column: &str) -> String {
        match self {
            Self::Sqlite => column.to_string(),
            Self::MySql => {
                format!("CONVERT({column} USING utf8mb4) COLLATE utf8mb4_bin AS {column}")
            }
        }
    }
}

/// Statements against the configuration table
#[derive(Debug, Clone)]
pub(crate) struct ConfigSql {
    pub distinct_paths: String,
    pub default_scope_pairs: String,
    pub count_rows: String,
    pub delete_rows: String,
    /// Prefix of a batched delete, completed with `(?, ?, ...)`
    pub delete_by_paths: String,
}

impl ConfigSql {
    pub fn new(tables: &TableNames, dialect: Dialect) -> Self {
        let table = &tables.config;
        Self {
            distinct_paths: format!(
                "SELECT DISTINCT {} FROM {table} ORDER BY path",
                dialect.select_exact("path")
            ),
            default_scope_pairs: format!(
                "SELECT DISTINCT {}, {} FROM {table} WHERE scope_id = ? ORDER BY path, value",
                dialect.select_exact("path"),
                dialect.select_exact("value")
            ),
            count_rows: format!(
                "SELECT COUNT(*) AS total FROM {table} WHERE {} = ? AND {} = ?",
                dialect.exact("path"),
                dialect.exact("value")
            ),
            delete_rows: format!(
                "DELETE FROM {table} WHERE {} = ? AND {} = ? AND scope_id <> ?",
                dialect.exact("path"),
                dialect.exact("value")
            ),
            delete_by_paths: format!("DELETE FROM {table} WHERE {} IN ", dialect.exact("path")),
        }
    }
}

/// Statements against the gallery tables
#[derive(Debug, Clone)]
pub(crate) struct MediaSql {
    pub referenced_files: String,
    pub count_orphaned_entities: String,
    pub delete_orphaned_entities: String,
    /// Prefix of a batched delete, completed with `(?, ?, ...)`
    pub delete_by_values: String,
}

impl MediaSql {
    pub fn new(tables: &TableNames, dialect: Dialect) -> Self {
        let gallery = &tables.gallery;
        let value_table = &tables.gallery_value;

        // An entity row is orphaned when its value_id has no value row. While
        // the value table is empty nothing counts as orphaned.
        let orphaned = format!(
            "EXISTS (SELECT 1 FROM {value_table}) \
             AND NOT EXISTS (SELECT 1 FROM {value_table} v WHERE v.value_id = {gallery}.value_id)"
        );

        Self {
            referenced_files: format!(
                "SELECT DISTINCT {} FROM {gallery} WHERE value IS NOT NULL AND NOT ({orphaned}) ORDER BY value",
                dialect.select_exact("value")
            ),
            count_orphaned_entities: format!(
                "SELECT COUNT(*) AS total FROM {gallery} WHERE {orphaned}"
            ),
            delete_orphaned_entities: format!("DELETE FROM {gallery} WHERE {orphaned}"),
            delete_by_values: format!(
                "DELETE FROM {gallery} WHERE {} IN ",
                dialect.exact("value")
            ),
        }
    }
}
