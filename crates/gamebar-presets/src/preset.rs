//! Preset data model and payload format.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::PresetError;
use crate::keys::tracked_key;
use crate::value::SettingValue;

/// Format of [`Preset::created_date`]. Lexical order equals time order.
pub const CREATED_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A named, timestamped snapshot of tracked overlay settings.
///
/// # Payload Format
///
/// Presets are stored and exported as a JSON document with exactly four
/// top-level fields. Setting values keep their native JSON type:
///
/// ```json
/// {
///   "id": "0b7d3c3e-9a51-4c7e-8f0e-2f8f5b0c1d2a",
///   "name": "Benchmark",
///   "createdDate": "2025-03-14 09:26:53",
///   "settings": {
///     "game_bar_fps_enable": true,
///     "game_bar_text_size": 14,
///     "game_bar_position": "top_left"
///   }
/// }
/// ```
///
/// Decoding validates each setting against the kind declared for its key in
/// [`TRACKED_KEYS`](crate::TRACKED_KEYS); keys that are not tracked are
/// dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    /// Unique identifier, assigned by the manager.
    pub id: String,

    /// Display name. May be empty and need not be unique.
    pub name: String,

    /// Creation time as `YYYY-MM-DD HH:MM:SS`.
    pub created_date: String,

    /// Captured settings keyed by full store key.
    pub settings: BTreeMap<String, SettingValue>,
}

/// Wire shape of a preset payload.
#[derive(Serialize, Deserialize)]
struct PresetDocument {
    id: String,
    name: String,
    #[serde(rename = "createdDate")]
    created_date: String,
    settings: serde_json::Map<String, serde_json::Value>,
}

impl Preset {
    /// Create an empty preset stamped with the current local time.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            created_date: timestamp_now(),
            settings: BTreeMap::new(),
        }
    }

    /// Override the creation timestamp.
    pub fn with_created_date(mut self, created_date: impl Into<String>) -> Self {
        self.created_date = created_date.into();
        self
    }

    /// Add a setting.
    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<SettingValue>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    /// Add multiple settings.
    pub fn with_settings<K, V>(mut self, settings: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<SettingValue>,
    {
        self.settings
            .extend(settings.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Load a preset from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PresetError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| PresetError::read_file(path, e))?;
        Self::from_json(&content)
    }

    /// Decode a preset payload.
    pub fn from_json(json: &str) -> Result<Self, PresetError> {
        let document: PresetDocument = serde_json::from_str(json)?;

        let mut settings = BTreeMap::new();
        for (key, raw) in document.settings {
            let Some(tracked) = tracked_key(&key) else {
                tracing::debug!(key = %key, preset = %document.id, "ignoring untracked key");
                continue;
            };
            let value = SettingValue::from_json(tracked.kind, &raw).ok_or_else(|| {
                PresetError::InvalidSetting {
                    key: key.clone(),
                    expected: tracked.kind,
                }
            })?;
            settings.insert(key, value);
        }

        Ok(Self {
            id: document.id,
            name: document.name,
            created_date: document.created_date,
            settings,
        })
    }

    /// Encode the preset payload.
    pub fn to_json(&self) -> Result<String, PresetError> {
        let mut settings = serde_json::Map::new();
        for (key, value) in &self.settings {
            let json = value
                .to_json()
                .ok_or_else(|| PresetError::NonFiniteFloat { key: key.clone() })?;
            settings.insert(key.clone(), json);
        }

        let document = PresetDocument {
            id: self.id.clone(),
            name: self.name.clone(),
            created_date: self.created_date.clone(),
            settings,
        };
        Ok(serde_json::to_string(&document)?)
    }

    /// Get a captured setting.
    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.settings.get(key)
    }

    /// Number of captured settings.
    pub fn len(&self) -> usize {
        self.settings.len()
    }

    /// Whether the preset captured no settings.
    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Iterate over captured settings in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.settings.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Generate a fresh preset identifier (random UUID v4).
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Current local time in [`CREATED_DATE_FORMAT`].
pub fn timestamp_now() -> String {
    chrono::Local::now().format(CREATED_DATE_FORMAT).to_string()
}
