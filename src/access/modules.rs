//! Module enablement

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Answers whether a feature module is switched on
pub trait ModuleSettings: Send + Sync {
    fn is_module_enabled(&self, key: &str) -> bool;
}

/// Known module states.
///
/// A module counts as enabled unless it is explicitly set to `false`. Keys
/// that have not been loaded yet are therefore enabled, so navigation does
/// not disappear while module settings are still arriving.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModulePolicy {
    states: HashMap<String, bool>,
}

impl ModulePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// A policy with the given modules switched off
    pub fn with_disabled<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            states: keys.into_iter().map(|k| (k.into(), false)).collect(),
        }
    }

    pub fn is_enabled(&self, key: &str) -> bool {
        self.states.get(key).copied().unwrap_or(true)
    }

    /// Record a module's state. Returns whether the effective state changed.
    pub fn set(&mut self, key: impl Into<String>, enabled: bool) -> bool {
        let key = key.into();
        let before = self.is_enabled(&key);
        self.states.insert(key, enabled);
        before != enabled
    }

    /// Explicitly known states
    pub fn states(&self) -> &HashMap<String, bool> {
        &self.states
    }
}

impl ModuleSettings for ModulePolicy {
    fn is_module_enabled(&self, key: &str) -> bool {
        self.is_enabled(key)
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for ModulePolicy {
    fn from_iter<T: IntoIterator<Item = (K, bool)>>(iter: T) -> Self {
        Self {
            states: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Published whenever a module is toggled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleChange {
    pub key: String,
    pub enabled: bool,
}
