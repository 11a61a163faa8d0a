//! Configuration table reconciliation
//!
//! Two independent passes over `core_config_data`: removal of paths the
//! schema no longer declares, and removal of scope overrides that repeat
//! the default-scope value.

mod orphans;
mod scopes;

use std::sync::Arc;

use eavclean_config::{ExclusionList, ValidatorErrorPolicy};
use eavclean_events::{EventEmitter, EventSender};
use eavclean_store::ConfigStore;

use crate::PathValidator;

/// Reconciler for configuration paths and scope overrides
pub struct ConfigReconciler {
    store: Arc<dyn ConfigStore>,
    validator: Arc<dyn PathValidator>,
    exclusions: ExclusionList,
    policy: ValidatorErrorPolicy,
    tx: Option<EventSender>,
}

impl ConfigReconciler {
    /// Create a reconciler using the built-in exclusion list
    #[must_use]
    pub fn new(store: Arc<dyn ConfigStore>, validator: Arc<dyn PathValidator>) -> Self {
        Self {
            store,
            validator,
            exclusions: ExclusionList::builtin(),
            policy: ValidatorErrorPolicy::default(),
            tx: None,
        }
    }

    /// Replace the exclusion list
    #[must_use]
    pub fn with_exclusions(mut self, exclusions: ExclusionList) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Set how validator failures other than rejections are handled
    #[must_use]
    pub fn with_validator_error_policy(mut self, policy: ValidatorErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }
}

impl EventEmitter for ConfigReconciler {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }
}
