//! Reconciliation run error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ReconcileError {
    #[error("invalid phase transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("path validator failed on '{path}': {reason}")]
    ValidatorFailed { path: String, reason: String },
}

impl UserFacingError for ReconcileError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::ValidatorFailed { .. } => {
                Some("No configuration rows were deleted; fix the validator and rerun.")
            }
            Self::InvalidTransition { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::InvalidTransition { .. } => "reconcile.invalid_transition",
            Self::ValidatorFailed { .. } => "reconcile.validator_failed",
        };
        Some(code)
    }
}
