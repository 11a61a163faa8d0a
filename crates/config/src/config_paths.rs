//! Orphaned configuration path settings

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What to do when the path validator fails for reasons other than
/// rejecting the path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorErrorPolicy {
    /// Abort the run before anything is deleted
    Abort,
    /// Count the path as orphaned
    TreatAsInvalid,
}

impl Default for ValidatorErrorPolicy {
    fn default() -> Self {
        Self::Abort
    }
}

/// Settings for orphaned configuration path detection
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigPathsConfig {
    /// Extra paths never reported as orphaned
    #[serde(default)]
    pub excluded: Vec<String>,
    /// File listing every declared configuration path
    pub declared_paths: Option<PathBuf>,
    #[serde(default)]
    pub validator_error_policy: ValidatorErrorPolicy,
}
