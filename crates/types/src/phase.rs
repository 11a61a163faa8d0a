//! Run phases shared by all reconcilers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Domain a reconciliation run operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileDomain {
    /// Configuration paths without a declared schema entry
    ConfigPaths,
    /// Scope overrides identical to the default value
    ConfigScopes,
    /// Product images on disk versus gallery rows
    Media,
}

impl fmt::Display for ReconcileDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigPaths => write!(f, "config-path"),
            Self::ConfigScopes => write!(f, "config-scope"),
            Self::Media => write!(f, "media"),
        }
    }
}

/// Lifecycle of a single reconciliation run.
///
/// `Idle -> Scanning -> (Applying ->) Reporting -> Idle`. Any phase may move
/// to `Failed`, which is terminal for the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Idle,
    Scanning,
    Applying,
    Reporting,
    Failed,
}

impl RunPhase {
    #[must_use]
    pub fn can_transition_to(self, next: RunPhase) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Scanning)
                | (Self::Scanning, Self::Applying | Self::Reporting)
                | (Self::Applying, Self::Reporting)
                | (Self::Reporting, Self::Idle)
                | (Self::Idle | Self::Scanning | Self::Applying | Self::Reporting, Self::Failed)
        )
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Failed)
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Scanning => "scanning",
            Self::Applying => "applying",
            Self::Reporting => "reporting",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dry_run_skips_applying() {
        assert!(RunPhase::Scanning.can_transition_to(RunPhase::Reporting));
        assert!(RunPhase::Scanning.can_transition_to(RunPhase::Applying));
        assert!(!RunPhase::Idle.can_transition_to(RunPhase::Applying));
        assert!(!RunPhase::Reporting.can_transition_to(RunPhase::Applying));
    }

    #[test]
    fn failed_is_terminal() {
        assert!(RunPhase::Applying.can_transition_to(RunPhase::Failed));
        assert!(!RunPhase::Failed.can_transition_to(RunPhase::Idle));
        assert!(RunPhase::Failed.is_terminal());
    }
}
