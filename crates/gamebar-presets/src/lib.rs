//! Preset management for GameBar overlay settings.
//!
//! This crate snapshots the overlay's tracked settings into named presets,
//! restores them, and moves them in and out of the key-value store as
//! portable JSON files.
//!
//! # Features
//!
//! - **Presets**: Save, list, load, rename and delete named snapshots
//! - **Import/Export**: Copy preset payloads to and from JSON files
//! - **Factory Reset**: Clear every tracked key from the live settings
//! - **Stores**: In-memory and JSON-file [`KeyValueStore`] backends
//! - **Paths**: Platform-specific store and config locations
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use gamebar_presets::{Edit, KeyValueStore, MemoryStore, PresetManager, SettingValue};
//!
//! let store = Arc::new(MemoryStore::new());
//! store
//!     .commit(Edit::new().put("game_bar_fps_enable", true).put("game_bar_text_size", 14))
//!     .unwrap();
//!
//! let manager = PresetManager::new(Arc::clone(&store));
//! let preset = manager.save("Benchmark").unwrap();
//! assert_eq!(preset.get("game_bar_text_size"), Some(&SettingValue::Int(14)));
//!
//! manager.reset_to_defaults().unwrap();
//! assert_eq!(store.get("game_bar_text_size").unwrap(), None);
//!
//! manager.load(&preset.id).unwrap();
//! assert_eq!(store.get("game_bar_text_size").unwrap(), Some(SettingValue::Int(14)));
//! ```

mod error;
mod index;
mod keys;
mod manager;
mod notify;
mod preset;
mod value;

/// Optional TOML configuration.
pub mod config;

/// Platform-specific paths for the store and configuration.
pub mod paths;

/// Key-value store contract and backends.
pub mod store;

pub use config::StoreConfig;
pub use error::{ConfigError, ErrorKind, PresetError, StoreError};
pub use index::{INDEX_KEY, PAYLOAD_KEY_PREFIX, PresetIndex, payload_key};
pub use keys::{
    KEY_PREFIX, TRACKED_KEYS, TRACKED_KEYS_VERSION, TrackedKey, is_tracked, resolve_key,
    tracked_key,
};
pub use manager::PresetManager;
pub use notify::{ApplySettings, ListenerId, PresetEvent, PresetEvents};
pub use paths::{
    config_file_path, default_store_path, ensure_user_config_dir, export_file_name,
    resolve_export_path, user_config_dir,
};
pub use preset::{CREATED_DATE_FORMAT, Preset, generate_id, timestamp_now};
pub use store::{Edit, EditOp, FileStore, KeyValueStore, MemoryStore};
pub use value::{SettingValue, ValueKind};
