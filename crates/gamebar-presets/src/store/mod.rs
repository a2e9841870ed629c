//! Key-value store contract and backends.
//!
//! The preset manager never touches storage directly; it talks to a
//! [`KeyValueStore`], the same way the overlay talks to its preference file.
//!
//! # Contract
//!
//! - [`get`](KeyValueStore::get) is a point read.
//! - [`commit`](KeyValueStore::commit) applies an [`Edit`] atomically: every
//!   operation in the batch becomes visible to later reads, or none does.
//!
//! Two backends ship with the crate:
//!
//! - [`MemoryStore`]: a process-local map, used by tests and embedders.
//! - [`FileStore`]: a JSON document on disk, rewritten by rename on commit.
//!
//! # Example
//!
//! ```rust
//! use gamebar_presets::{Edit, KeyValueStore, MemoryStore, SettingValue};
//!
//! let store = MemoryStore::new();
//! store
//!     .commit(Edit::new().put("game_bar_text_size", 14).remove("game_bar_padding"))
//!     .unwrap();
//! assert_eq!(store.get("game_bar_text_size").unwrap(), Some(SettingValue::Int(14)));
//! ```

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::StoreError;
use crate::value::SettingValue;
use std::sync::Arc;

/// A single operation inside an [`Edit`].
#[derive(Debug, Clone, PartialEq)]
pub enum EditOp {
    /// Set `key` to the value.
    Put(String, SettingValue),
    /// Delete `key`; removing an absent key is a no-op.
    Remove(String),
}

impl EditOp {
    /// Key touched by the operation.
    pub fn key(&self) -> &str {
        match self {
            EditOp::Put(key, _) | EditOp::Remove(key) => key,
        }
    }
}

/// An ordered batch of writes, applied by [`KeyValueStore::commit`].
///
/// Operations apply in insertion order, so a later operation on the same key
/// wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Edit {
    ops: Vec<EditOp>,
}

impl Edit {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a write of `value` under `key`.
    pub fn put(mut self, key: impl Into<String>, value: impl Into<SettingValue>) -> Self {
        self.ops.push(EditOp::Put(key.into(), value.into()));
        self
    }

    /// Queue removal of `key`.
    pub fn remove(mut self, key: impl Into<String>) -> Self {
        self.ops.push(EditOp::Remove(key.into()));
        self
    }

    /// Queued operations, in order.
    pub fn ops(&self) -> &[EditOp] {
        &self.ops
    }

    /// Number of queued operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Apply the batch to a map-like target.
    pub(crate) fn apply_to<M>(self, map: &mut M)
    where
        M: MapTarget,
    {
        for op in self.ops {
            match op {
                EditOp::Put(key, value) => map.put(key, value),
                EditOp::Remove(key) => map.remove(&key),
            }
        }
    }
}

impl IntoIterator for Edit {
    type Item = EditOp;
    type IntoIter = std::vec::IntoIter<EditOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

/// Internal sink used by backends to replay an [`Edit`].
pub(crate) trait MapTarget {
    fn put(&mut self, key: String, value: SettingValue);
    fn remove(&mut self, key: &str);
}

impl MapTarget for std::collections::HashMap<String, SettingValue> {
    fn put(&mut self, key: String, value: SettingValue) {
        self.insert(key, value);
    }

    fn remove(&mut self, key: &str) {
        std::collections::HashMap::remove(self, key);
    }
}

impl MapTarget for std::collections::BTreeMap<String, SettingValue> {
    fn put(&mut self, key: String, value: SettingValue) {
        self.insert(key, value);
    }

    fn remove(&mut self, key: &str) {
        std::collections::BTreeMap::remove(self, key);
    }
}

/// Persistent string-keyed store of scalar values.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<SettingValue>, StoreError>;

    /// Atomically apply every operation in `edit`.
    fn commit(&self, edit: Edit) -> Result<(), StoreError>;

    /// Read `key` as a string.
    ///
    /// A value of another kind reads as `None`.
    fn get_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(match self.get(key)? {
            Some(SettingValue::String(s)) => Some(s),
            _ => None,
        })
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<SettingValue>, StoreError> {
        (**self).get(key)
    }

    fn commit(&self, edit: Edit) -> Result<(), StoreError> {
        (**self).commit(edit)
    }
}
