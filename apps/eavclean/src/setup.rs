//! Wiring of stores, validator and filesystem into reconcilers

use std::path::PathBuf;
use std::sync::Arc;

use eavclean_config::Config;
use eavclean_errors::{ConfigError, FilesystemError};
use eavclean_events::EventSender;
use eavclean_reconcile::{
    ConfigReconciler, DeclaredPathValidator, LocalFilesystem, MediaReconciler,
};
use eavclean_store::Stores;
use tracing::debug;

use crate::error::CliError;

/// Resources shared by every command
pub struct SystemSetup {
    config: Config,
    stores: Option<Stores>,
}

impl SystemSetup {
    /// Create new system setup
    pub fn new(config: Config) -> Self {
        Self {
            config,
            stores: None,
        }
    }

    /// Open the database
    pub async fn initialize(&mut self) -> Result<(), CliError> {
        let stores = eavclean_store::open_stores(&self.config.database).await?;
        debug!(backend = ?stores.backend, "database ready");
        self.stores = Some(stores);
        Ok(())
    }

    fn stores(&self) -> Result<&Stores, CliError> {
        self.stores
            .as_ref()
            .ok_or_else(|| CliError::Run(eavclean_errors::Error::internal("stores not initialized")))
    }

    /// Reconciler for configuration paths and scopes
    ///
    /// `with_validator` loads the declared path list, which only the
    /// orphaned path cleanup needs.
    pub async fn config_reconciler(
        &self,
        tx: EventSender,
        with_validator: bool,
    ) -> Result<ConfigReconciler, CliError> {
        let validator = if with_validator {
            let path = self
                .config
                .config_paths
                .declared_paths
                .as_ref()
                .ok_or_else(|| ConfigError::MissingField {
                    field: "config_paths.declared_paths".to_string(),
                })?;
            DeclaredPathValidator::load(path).await?
        } else {
            DeclaredPathValidator::default()
        };

        Ok(
            ConfigReconciler::new(self.stores()?.config.clone(), Arc::new(validator))
                .with_exclusions(self.config.exclusions())
                .with_validator_error_policy(self.config.config_paths.validator_error_policy)
                .with_event_sender(tx),
        )
    }

    /// Reconciler for product images below the canonical image root
    pub async fn media_reconciler(&self, tx: EventSender) -> Result<MediaReconciler, CliError> {
        let root = self.image_root().await?;
        let skip_dirs = self.config.media.cache_dir_names.clone();
        let walker = LocalFilesystem::new().skipping_dirs(skip_dirs.iter().cloned());

        Ok(
            MediaReconciler::new(self.stores()?.media.clone(), Arc::new(walker), root)
                .with_skip_dirs(skip_dirs)
                .with_event_sender(tx),
        )
    }

    async fn image_root(&self) -> Result<PathBuf, CliError> {
        let root = self.config.image_root()?;
        let canonical = tokio::fs::canonicalize(&root).await.map_err(|e| {
            eavclean_errors::Error::from(FilesystemError::RootUnreadable {
                path: root.clone(),
                message: e.to_string(),
            })
        })?;
        debug!(root = %canonical.display(), "image root");
        Ok(canonical)
    }
}
