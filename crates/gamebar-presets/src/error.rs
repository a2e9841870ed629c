//! Error types for store and preset operations.

use std::path::PathBuf;
use thiserror::Error;

use crate::value::ValueKind;

/// Errors raised by a [`KeyValueStore`](crate::KeyValueStore) backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed
    #[error("store I/O failed on '{path}': {source}")]
    Io {
        /// Path of the backing file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The backing file exists but is not a valid store document
    #[error("store file '{path}' is corrupt: {source}")]
    Corrupt {
        /// Path of the backing file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Encoding the store document failed
    #[error("failed to encode store document: {0}")]
    Encode(#[source] serde_json::Error),

    /// A float value is NaN or infinite and has no JSON form
    #[error("cannot store non-finite float under '{key}'")]
    NonFiniteFloat {
        /// Key of the offending value.
        key: String,
    },
}

impl StoreError {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a corrupt-document error.
    pub fn corrupt(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        StoreError::Corrupt {
            path: path.into(),
            source,
        }
    }
}

/// Broad failure class of a [`PresetError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The referenced preset does not exist.
    NotFound,
    /// Stored or imported bytes are not a valid preset or index document.
    MalformedPayload,
    /// The store or the filesystem failed.
    Io,
}

/// Errors that can occur during preset operations.
#[derive(Debug, Error)]
pub enum PresetError {
    /// No payload is stored under the identifier
    #[error("preset not found: {0}")]
    PresetNotFound(String),

    /// Payload is not a JSON preset document or lacks a required field
    #[error("malformed preset payload: {0}")]
    Parse(#[from] serde_json::Error),

    /// A setting does not fit the kind declared for its key
    #[error("setting '{key}' is not a valid {expected} value")]
    InvalidSetting {
        /// Store key of the offending setting.
        key: String,
        /// Kind declared for the key.
        expected: ValueKind,
    },

    /// A float setting is NaN or infinite and cannot be written as JSON
    #[error("setting '{key}' holds a non-finite float")]
    NonFiniteFloat {
        /// Store key of the offending setting.
        key: String,
    },

    /// The preset index is not a JSON array of identifiers
    #[error("preset index is corrupt: {0}")]
    CorruptIndex(#[source] serde_json::Error),

    /// The key-value store failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl PresetError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PresetError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PresetError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PresetError::PresetNotFound(_) => ErrorKind::NotFound,
            PresetError::Parse(_)
            | PresetError::InvalidSetting { .. }
            | PresetError::NonFiniteFloat { .. }
            | PresetError::CorruptIndex(_) => ErrorKind::MalformedPayload,
            PresetError::Store(_) | PresetError::ReadFile { .. } | PresetError::WriteFile { .. } => {
                ErrorKind::Io
            }
        }
    }

    /// Whether the error is [`ErrorKind::NotFound`].
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

/// Errors that can occur while loading the TOML config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file
    #[error("failed to read config '{path}': {source}")]
    ReadFile {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Failed to write the config file
    #[error("failed to write config '{path}': {source}")]
    WriteFile {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }
}
