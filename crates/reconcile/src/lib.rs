#![warn(mismatched_lifetime_syntaxes)]
#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Reconciliation engine for eavclean
//!
//! Each reconciler works through collaborator traits ([`ConfigStore`],
//! [`MediaStore`], [`PathValidator`], [`FilesystemWalker`]), runs in a single
//! sequential pass and honours a dry-run flag: a dry run computes the same
//! report as a real run and performs no deletion.
//!
//! [`ConfigStore`]: eavclean_store::ConfigStore
//! [`MediaStore`]: eavclean_store::MediaStore

pub mod config;
pub mod media;
mod phase;
mod validator;
mod walker;

pub use config::ConfigReconciler;
pub use media::MediaReconciler;
pub use phase::PhaseTracker;
pub use validator::{DeclaredPathValidator, PathValidator};
pub use walker::{FileIter, FileStat, FilesystemWalker, LocalFilesystem};
