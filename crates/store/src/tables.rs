//! Table names with the installation's table prefix applied

use eavclean_config::constants::{CONFIG_TABLE, GALLERY_TABLE, GALLERY_VALUE_TABLE};
use eavclean_errors::{ConfigError, Error};

/// Fully qualified names of the tables eavclean reads and prunes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    pub config: String,
    pub gallery: String,
    pub gallery_value: String,
}

impl TableNames {
    /// Apply `prefix` to every table name.
    ///
    /// Table names are spliced into SQL text, so the prefix is restricted to
    /// ASCII alphanumerics and underscores.
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix contains any other character.
    pub fn with_prefix(prefix: &str) -> Result<Self, Error> {
        if !prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(ConfigError::InvalidValue {
                field: "database.table_prefix".to_string(),
                value: prefix.to_string(),
            }
            .into());
        }

        Ok(Self {
            config: format!("{prefix}{CONFIG_TABLE}"),
            gallery: format!("{prefix}{GALLERY_TABLE}"),
            gallery_value: format!("{prefix}{GALLERY_VALUE_TABLE}"),
        })
    }
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            config: CONFIG_TABLE.to_string(),
            gallery: GALLERY_TABLE.to_string(),
            gallery_value: GALLERY_VALUE_TABLE.to_string(),
        }
    }
}
