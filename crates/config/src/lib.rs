#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for eavclean
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/eavclean/config.toml)
//! - Environment variables
//! - CLI flags (applied by the binary)

pub mod config_paths;
pub mod constants;
pub mod sections;
pub mod exclusions;

pub use config_paths::{ConfigPathsConfig, ValidatorErrorPolicy};
pub use sections::{DatabaseConfig, GeneralConfig, MediaConfig, PathConfig};
pub use exclusions::{ExclusionList, BUILTIN_EXCLUDED_PATHS};

use constants::{ENV_COLOR, ENV_DATABASE_URL, ENV_DECLARED_PATHS, ENV_MEDIA_ROOT, ENV_TABLE_PREFIX};
use eavclean_errors::{ConfigError, Error};
use eavclean_types::ColorChoice;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub media: MediaConfig,

    #[serde(default)]
    pub config_paths: ConfigPathsConfig,

    #[serde(default)]
    pub paths: PathConfig,
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("eavclean").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        tracing::debug!(path = %path.display(), "loading configuration file");

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        if let Ok(url) = std::env::var(ENV_DATABASE_URL) {
            self.database.url = Some(url);
        }

        if let Ok(prefix) = std::env::var(ENV_TABLE_PREFIX) {
            self.database.table_prefix = prefix;
        }

        if let Ok(root) = std::env::var(ENV_MEDIA_ROOT) {
            self.media.root = Some(PathBuf::from(root));
        }

        if let Ok(declared) = std::env::var(ENV_DECLARED_PATHS) {
            self.config_paths.declared_paths = Some(PathBuf::from(declared));
        }

        if let Ok(color) = std::env::var(ENV_COLOR) {
            self.general.color = match color.as_str() {
                "always" => ColorChoice::Always,
                "auto" => ColorChoice::Auto,
                "never" => ColorChoice::Never,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: ENV_COLOR.to_string(),
                        value: color,
                    }
                    .into())
                }
            };
        }

        Ok(())
    }

    /// Get the product image directory (`<media root>/catalog/product`)
    ///
    /// # Errors
    ///
    /// Returns an error if no media root is configured.
    pub fn image_root(&self) -> Result<PathBuf, Error> {
        let root = self
            .media
            .root
            .as_ref()
            .ok_or_else(|| ConfigError::MissingField {
                field: "media.root".to_string(),
            })?;
        Ok(root.join(&self.media.product_subdir))
    }

    /// Built-in exclusions merged with the configured ones
    #[must_use]
    pub fn exclusions(&self) -> ExclusionList {
        ExclusionList::builtin().merged_with(self.config_paths.excluded.iter().cloned())
    }

    /// Get the debug log directory (with default)
    #[must_use]
    pub fn logs_dir(&self) -> PathBuf {
        self.paths.logs_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("eavclean")
                .join("logs")
        })
    }
}
