//! Shared CLI helpers used across multiple commands.

use anyhow::Context as _;
use gamebar_presets::{
    ApplySettings, FileStore, KeyValueStore, PresetManager, SettingValue, StoreConfig,
    TRACKED_KEYS, TrackedKey, config_file_path, resolve_key,
};
use std::path::Path;
use std::sync::Arc;

/// Resolved configuration and the opened settings store.
pub struct Context {
    pub config: StoreConfig,
    pub store: Arc<FileStore>,
}

impl Context {
    /// Load the config file and open the store it (or `store`) points at.
    pub fn open(store: Option<&Path>, config: Option<&Path>) -> anyhow::Result<Self> {
        let config_path = config.map_or_else(config_file_path, Path::to_path_buf);
        let config = StoreConfig::load(&config_path)
            .with_context(|| format!("failed to load {}", config_path.display()))?;

        let store_path = config.resolve_store_path(store);
        let store = FileStore::open(&store_path)
            .with_context(|| format!("failed to open settings store {}", store_path.display()))?;

        Ok(Self {
            config,
            store: Arc::new(store),
        })
    }

    /// Preset manager over the opened store.
    pub fn manager(&self) -> PresetManager<FileStore> {
        PresetManager::new(Arc::clone(&self.store)).with_notifier(Arc::new(LogNotifier))
    }
}

/// Apply-settings collaborator for a process with no overlay attached.
///
/// The overlay picks up store changes on its next start, so notifications
/// are only logged.
pub struct LogNotifier;

impl ApplySettings for LogNotifier {
    fn apply_preferences(&self) {
        tracing::info!("settings changed, overlay will re-read preferences");
    }

    fn is_showing(&self) -> bool {
        false
    }

    fn hide(&self) {
        tracing::debug!("hide overlay");
    }

    fn show(&self) {
        tracing::debug!("show overlay");
    }
}

/// Resolve a tracked key given as `fps_enable`, `fps-enable` or
/// `game_bar_fps_enable`.
pub fn lookup_key(name: &str) -> anyhow::Result<&'static TrackedKey> {
    resolve_key(name).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown setting '{}'. Use 'gamebar settings keys' to list tracked settings.",
            name
        )
    })
}

/// Parse `text` as a value of the kind declared for `key`.
pub fn parse_setting(key: &TrackedKey, text: &str) -> anyhow::Result<SettingValue> {
    SettingValue::parse(key.kind, text).ok_or_else(|| {
        anyhow::anyhow!(
            "'{}' is not a valid {} value for {}",
            text,
            key.kind,
            key.short_name()
        )
    })
}

/// Print the live value of every tracked key.
pub fn print_settings(store: &impl KeyValueStore) {
    for key in TRACKED_KEYS {
        let shown = match store.get(key.name) {
            Ok(Some(value)) => value.to_string(),
            Ok(None) => "(default)".to_string(),
            Err(e) => format!("(unreadable: {e})"),
        };
        println!("  {:<28} {}", key.short_name(), shown);
    }
}
