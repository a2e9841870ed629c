//! In-memory store backend.

use parking_lot::RwLock;
use std::collections::HashMap;

use super::{Edit, KeyValueStore};
use crate::error::StoreError;
use crate::value::SettingValue;

/// Process-local [`KeyValueStore`].
///
/// Commits hold the write lock for the whole batch, so readers see either
/// none or all of an [`Edit`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, SettingValue>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `values`.
    pub fn with_values<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<SettingValue>,
    {
        Self {
            values: RwLock::new(
                values
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }

    /// All stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.values.read().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<SettingValue>, StoreError> {
        Ok(self.values.read().get(key).cloned())
    }

    fn commit(&self, edit: Edit) -> Result<(), StoreError> {
        let mut values = self.values.write();
        edit.apply_to(&mut *values);
        Ok(())
    }
}
