//! Optional TOML configuration.
//!
//! ```toml
//! # ~/.config/gamebar/config.toml
//! store_path = "/data/gamebar/settings.json"
//! export_dir = "/home/me/presets"
//! ```
//!
//! Every field is optional; a missing file is the same as an empty one.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::paths;

/// Settings read from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Settings store file, overriding [`paths::default_store_path`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,

    /// Directory exports go to when no destination is given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

impl StoreConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::ReadFile {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    /// Load from the default location, [`paths::config_file_path`].
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(paths::config_file_path())
    }

    /// Parse a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Convert to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save to `path`, creating the parent directory if needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        std::fs::write(path, self.to_toml()?).map_err(|e| ConfigError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Store file to open: `explicit` if given, then `store_path`, then the
    /// platform default.
    pub fn resolve_store_path(&self, explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.store_path.clone())
            .unwrap_or_else(paths::default_store_path)
    }

    /// Directory for exports without an explicit destination.
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
