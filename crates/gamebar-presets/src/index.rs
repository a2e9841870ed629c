//! Preset index: the set of identifiers of every stored preset.

use std::collections::BTreeSet;

use crate::error::PresetError;
use crate::store::KeyValueStore;
use crate::value::SettingValue;

/// Store key holding the index document.
pub const INDEX_KEY: &str = "gamebar_preset_list";

/// Prefix of the store key holding a preset payload.
pub const PAYLOAD_KEY_PREFIX: &str = "gamebar_presets_";

/// Store key of the payload for preset `id`.
pub fn payload_key(id: &str) -> String {
    format!("{PAYLOAD_KEY_PREFIX}{id}")
}

/// In-memory copy of the index.
///
/// Persisted as a JSON array of identifier strings under [`INDEX_KEY`],
/// written in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresetIndex {
    ids: BTreeSet<String>,
}

impl PresetIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the index from `store`. An absent key reads as empty.
    pub fn read<S: KeyValueStore + ?Sized>(store: &S) -> Result<Self, PresetError> {
        match store.get_string(INDEX_KEY)? {
            Some(json) => Self::from_json(&json),
            None => Ok(Self::new()),
        }
    }

    /// Decode an index document.
    pub fn from_json(json: &str) -> Result<Self, PresetError> {
        let ids: Vec<String> = serde_json::from_str(json).map_err(PresetError::CorruptIndex)?;
        Ok(Self {
            ids: ids.into_iter().collect(),
        })
    }

    /// Encode the index document.
    pub fn to_json(&self) -> String {
        let ids: Vec<&str> = self.ids.iter().map(String::as_str).collect();
        serde_json::Value::from(ids).to_string()
    }

    /// The index document as a store value.
    pub fn to_value(&self) -> SettingValue {
        SettingValue::String(self.to_json())
    }

    /// Add `id`. Returns `false` if it was already present.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    /// Remove `id`. Returns `false` if it was absent.
    pub fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    /// Whether `id` is a member.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Members in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}
