//! Module registry: the directory mapping stable module ids to their
//! rendering capability.
//!
//! The registry is an explicitly constructed object handed to the page
//! controllers at startup, not a process global. Modules are registered
//! from a static list at application start (see `informar-modules`), so one
//! misbehaving registration cannot block the others: a descriptor without a
//! usable id is rejected with a logged error, never a panic.

use crate::module::AnalyticsModule;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error};

/// Directory of registered analytics modules, keyed by id.
#[derive(Default)]
pub struct ModuleRegistry {
    modules: HashMap<String, Arc<dyn AnalyticsModule>>,
}

impl ModuleRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module.
    ///
    /// Last registration for an id wins silently. A module with an empty id
    /// is rejected: the failure is logged and the registry is left
    /// unchanged, since registration happens at startup and one bad module
    /// must not take the page down.
    pub fn register(&mut self, module: Arc<dyn AnalyticsModule>) {
        let id = module.id().to_string();
        if id.is_empty() {
            error!("rejecting module registration with empty id");
            return;
        }
        if self.modules.insert(id.clone(), module).is_some() {
            debug!(id, "module re-registered, previous entry replaced");
        }
    }

    /// Look up a module by id. Never panics; absent ids return `None`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<dyn AnalyticsModule>> {
        self.modules.get(id).cloned()
    }

    /// Snapshot of every registered module, sorted by id for deterministic
    /// listings.
    #[must_use]
    pub fn all(&self) -> Vec<Arc<dyn AnalyticsModule>> {
        let mut modules: Vec<_> = self.modules.values().cloned().collect();
        modules.sort_by(|a, b| a.id().cmp(b.id()));
        modules
    }

    /// Registered ids, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.modules.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of registered modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
