//! Scoped key-value preference storage
//!
//! The installed map version is persisted through a [`PreferenceStore`]
//! injected into the reconciler rather than looked up globally. Each store is
//! scoped to a namespace.
//!
//! ## Module Organization
//!
//! - `json.rs`: durable store backed by one JSON file per namespace

pub mod json;

#[cfg(test)]
use std::collections::BTreeMap;

use crate::error::Result;

pub use json::JsonPreferences;

/// Namespace holding the map reconciler's preferences
pub const MAP_NAMESPACE: &str = "TaiwanMapView";

/// Key of the Installed Map Version Record
pub const MAP_VERSION_KEY: &str = "map.version";

/// Durable key-value store with integer values
pub trait PreferenceStore: Send {
    /// Namespace this store is scoped to
    fn namespace(&self) -> &str;

    /// Read an integer, falling back to `default` when the key is absent
    fn get_int(&self, key: &str, default: u64) -> u64;

    /// Durably store an integer
    ///
    /// When this returns an error the previously stored value is still the
    /// one returned by [`PreferenceStore::get_int`].
    fn put_int(&mut self, key: &str, value: u64) -> Result<()>;

    /// Pick up values written by other processes since the store was opened
    fn reload(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Volatile store for unit tests
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    namespace: String,
    values: BTreeMap<String, u64>,
}

#[cfg(test)]
impl MemoryPreferences {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            values: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
impl PreferenceStore for MemoryPreferences {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn get_int(&self, key: &str, default: u64) -> u64 {
        self.values.get(key).copied().unwrap_or(default)
    }

    fn put_int(&mut self, key: &str, value: u64) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}
