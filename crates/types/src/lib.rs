#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for eavclean
//!
//! Shared vocabulary of the reconciliation engine: configuration rows, media
//! file references, run phases and the reports handed back to callers.

pub mod entry;
pub mod media;
pub mod phase;
pub mod reports;

pub use entry::{ConfigPair, DEFAULT_SCOPE_ID};
pub use media::MediaFileRef;
pub use phase::{ReconcileDomain, RunPhase};
pub use reports::{MediaReport, OrphanedPathReport, ReconciliationReport, ScopeDuplicateReport};

use serde::{Deserialize, Serialize};

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    Always,
    Auto,
    Never,
}

// Implement clap::ValueEnum for ColorChoice
impl clap::ValueEnum for ColorChoice {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Always, Self::Auto, Self::Never]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Always => clap::builder::PossibleValue::new("always"),
            Self::Auto => clap::builder::PossibleValue::new("auto"),
            Self::Never => clap::builder::PossibleValue::new("never"),
        })
    }
}

impl Default for ColorChoice {
    fn default() -> Self {
        Self::Auto
    }
}

/// Verb used when reporting what a run did or would do.
#[must_use]
pub fn action_label(dry_run: bool) -> &'static str {
    if dry_run {
        "Would remove"
    } else {
        "Removed"
    }
}
