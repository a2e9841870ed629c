//! Platform-specific paths for the settings store and configuration.
//!
//! # Directory Structure
//!
//! - **Config dir**: `~/.config/gamebar/` (Linux), `~/Library/Application Support/gamebar/` (macOS), `%APPDATA%\gamebar\` (Windows)
//! - **Settings store**: `<config dir>/settings.json`
//! - **Config file**: `<config dir>/config.toml`
//!
//! # Example
//!
//! ```rust,no_run
//! use gamebar_presets::paths;
//!
//! println!("Settings store: {:?}", paths::default_store_path());
//! println!("Config file: {:?}", paths::config_file_path());
//! ```

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::preset::Preset;

/// Application name used for directory paths.
const APP_NAME: &str = "gamebar";

/// File name of the settings store.
const STORE_FILE: &str = "settings.json";

/// File name of the TOML configuration.
const CONFIG_FILE: &str = "config.toml";

/// Extension of exported preset files.
pub const EXPORT_EXTENSION: &str = "json";

/// Returns the user-specific configuration directory.
///
/// # Platform Paths
///
/// - Linux: `~/.config/gamebar/`
/// - macOS: `~/Library/Application Support/gamebar/`
/// - Windows: `%APPDATA%\gamebar\`
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default location of the settings store file.
pub fn default_store_path() -> PathBuf {
    user_config_dir().join(STORE_FILE)
}

/// Location of the optional TOML configuration file.
pub fn config_file_path() -> PathBuf {
    user_config_dir().join(CONFIG_FILE)
}

/// Ensure the user config directory exists.
///
/// Creates the directory and any parent directories if they don't exist.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_user_config_dir() -> Result<PathBuf, ConfigError> {
    let dir = user_config_dir();

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::create_dir(&dir, e))?;
    }

    Ok(dir)
}

/// File name for exporting `preset`.
///
/// Derived from the preset name with anything outside `[A-Za-z0-9_-]`
/// replaced by `_`. Falls back to the id when the name has no usable
/// characters.
///
/// # Example
///
/// ```rust
/// use gamebar_presets::{Preset, paths::export_file_name};
///
/// let preset = Preset::new("1234", "My Preset!");
/// assert_eq!(export_file_name(&preset), "My_Preset_.json");
/// ```
pub fn export_file_name(preset: &Preset) -> String {
    let sanitized: String = preset
        .name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let stem = if sanitized.chars().any(|c| c.is_ascii_alphanumeric()) {
        sanitized
    } else {
        preset.id.clone()
    };
    format!("{stem}.{EXPORT_EXTENSION}")
}

/// Resolve where to export a preset.
///
/// - an existing directory → `dir/<file_name()>`
/// - any other path is used as the file path, and `file_name` is not called
/// - `None` → `fallback_dir/<file_name()>`
pub fn resolve_export_path(
    destination: Option<&Path>,
    fallback_dir: &Path,
    file_name: impl FnOnce() -> String,
) -> PathBuf {
    match destination {
        Some(path) if !path.is_dir() => path.to_path_buf(),
        Some(dir) => dir.join(file_name()),
        None => fallback_dir.join(file_name()),
    }
}
