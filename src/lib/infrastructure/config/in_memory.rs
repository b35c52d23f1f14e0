//! In-memory configuration store

use std::collections::HashMap;

use crate::domain::config::{ScopeConfig, StoreScope};

/// Configuration values held in memory, keyed by scope and path.
///
/// Store lookups fall back to the default scope when the store has no value
/// of its own.
#[derive(Clone, Debug, Default)]
pub struct InMemoryScopeConfig {
    values: HashMap<(StoreScope, String), String>,
}

impl InMemoryScopeConfig {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `path` to `value` for `scope`
    pub fn set(&mut self, scope: StoreScope, path: &str, value: &str) -> &mut Self {
        self.values.insert((scope, path.to_string()), value.to_string());
        self
    }

    /// Builder-style variant of [`InMemoryScopeConfig::set`]
    pub fn with(mut self, scope: StoreScope, path: &str, value: &str) -> Self {
        self.set(scope, path, value);
        self
    }
}

impl ScopeConfig for InMemoryScopeConfig {
    fn value(&self, path: &str, scope: &StoreScope) -> Option<String> {
        self.values
            .get(&(scope.clone(), path.to_string()))
            .or_else(|| match scope {
                StoreScope::Default => None,
                StoreScope::Store(_) => self.values.get(&(StoreScope::Default, path.to_string())),
            })
            .cloned()
    }
}
