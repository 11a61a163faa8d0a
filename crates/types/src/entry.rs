//! Configuration table row types

use serde::{Deserialize, Serialize};

/// Scope id of the global default configuration scope.
pub const DEFAULT_SCOPE_ID: i64 = 0;

/// A distinct `(path, value)` pair read from the default scope.
///
/// `value` is `None` when the stored value is SQL `NULL`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigPair {
    pub path: String,
    pub value: Option<String>,
}

impl ConfigPair {
    pub fn new(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            value: Some(value.into()),
        }
    }
}
