//! Configuration path validator error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

/// Errors raised by a path validator.
///
/// `Malformed` is part of the validator contract and means "not a declared
/// path". `Unavailable` is a systemic failure and says nothing about the path.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("malformed configuration path '{path}': {reason}")]
    Malformed { path: String, reason: String },

    #[error("path validator unavailable: {reason}")]
    Unavailable { reason: String },
}

impl ValidationError {
    /// Whether the error is the validator's documented "invalid path" signal.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}

impl UserFacingError for ValidationError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::Unavailable { .. } => Some(
                "Check config_paths.declared_paths, or set validator_error_policy = \"treat_as_invalid\" to accept the risk.",
            ),
            Self::Malformed { .. } => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::Malformed { .. } => "validation.malformed",
            Self::Unavailable { .. } => "validation.unavailable",
        };
        Some(code)
    }
}
