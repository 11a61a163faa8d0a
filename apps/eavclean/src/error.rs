//! CLI error handling

use std::fmt;

use eavclean_errors::UserFacingError;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Configuration error
    Config(eavclean_errors::ConfigError),
    /// Error raised while setting up or running a cleanup
    Run(eavclean_errors::Error),
    /// The user declined the confirmation prompt
    Aborted,
    /// One or more domains of a combined run failed
    Incomplete(usize),
    /// Invalid command arguments
    InvalidArguments(String),
    /// I/O error
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => write!(f, "Configuration error: {e}"),
            CliError::Run(e) => {
                let message = e.user_message();
                write!(f, "{message}")?;
                if let Some(code) = e.user_code() {
                    write!(f, "\n  Code: {code}")?;
                }
                if let Some(hint) = e.user_hint() {
                    write!(f, "\n  Hint: {hint}")?;
                }
                if e.is_retryable() {
                    write!(f, "\n  Retry: safe to retry this operation.")?;
                }
                Ok(())
            }
            CliError::Aborted => write!(f, "Aborted."),
            CliError::Incomplete(count) => write!(f, "{count} cleanup(s) failed"),
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Run(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<eavclean_errors::ConfigError> for CliError {
    fn from(e: eavclean_errors::ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<eavclean_errors::Error> for CliError {
    fn from(e: eavclean_errors::Error) -> Self {
        match e {
            eavclean_errors::Error::Config(config) => CliError::Config(config),
            other => CliError::Run(other),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}
