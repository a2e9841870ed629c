//! JSON file store backend.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::{Edit, KeyValueStore};
use crate::error::StoreError;
use crate::value::SettingValue;

/// [`KeyValueStore`] persisted as a single JSON document.
///
/// Values are written type-tagged so integers keep their width:
///
/// ```json
/// {
///   "game_bar_fps_enable": { "bool": true },
///   "game_bar_text_size": { "int": 14 }
/// }
/// ```
///
/// The document is read once at [`open`](FileStore::open) and cached. A
/// commit applies the edit to a copy of the cache, writes the copy to a
/// uniquely named sibling temporary file, and renames it over the store file.
/// The cache is only replaced after the rename succeeds, so a failed commit
/// leaves both the file and the in-memory view unchanged.
///
/// NaN and infinite floats have no JSON form; a commit that would store one
/// fails with [`StoreError::NonFiniteFloat`].
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, SettingValue>>,
}

impl FileStore {
    /// Open the store at `path`.
    ///
    /// A missing file opens as an empty store; the file (and its parent
    /// directory) is created on first commit.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => {
                serde_json::from_str(&content).map_err(|e| StoreError::corrupt(&path, e))?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StoreError::io(&path, e)),
        };

        tracing::debug!(path = %path.display(), keys = values.len(), "opened file store");

        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.values.read().keys().cloned().collect()
    }

    fn write_document(&self, values: &BTreeMap<String, SettingValue>) -> Result<(), StoreError> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let content = serde_json::to_string_pretty(values).map_err(StoreError::Encode)?;

        // Unique sibling per commit, removed on drop if anything below fails.
        let mut temp = NamedTempFile::new_in(parent).map_err(|e| StoreError::io(parent, e))?;
        temp.write_all(content.as_bytes())
            .and_then(|()| temp.as_file().sync_all())
            .map_err(|e| StoreError::io(&self.path, e))?;
        temp.persist(&self.path)
            .map_err(|e| StoreError::io(&self.path, e.error))?;
        Ok(())
    }
}

/// First key whose value JSON cannot represent.
fn non_finite_key(values: &BTreeMap<String, SettingValue>) -> Option<&str> {
    values
        .iter()
        .find(|(_, value)| matches!(value, SettingValue::Float(f) if !f.is_finite()))
        .map(|(key, _)| key.as_str())
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<SettingValue>, StoreError> {
        Ok(self.values.read().get(key).cloned())
    }

    fn commit(&self, edit: Edit) -> Result<(), StoreError> {
        let ops = edit.len();
        let mut values = self.values.write();
        let mut next = values.clone();
        edit.apply_to(&mut next);
        if let Some(key) = non_finite_key(&next) {
            return Err(StoreError::NonFiniteFloat {
                key: key.to_string(),
            });
        }
        self.write_document(&next)?;
        *values = next;

        tracing::debug!(path = %self.path.display(), ops, "committed store edit");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path().join("settings.json")).unwrap();
        assert!(store.keys().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn commit_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");

        let store = FileStore::open(&path).unwrap();
        store
            .commit(
                Edit::new()
                    .put("game_bar_fps_enable", true)
                    .put("game_bar_text_size", 14)
                    .put("big", 1_i64 << 40)
                    .put("game_bar_position", "top_left"),
            )
            .unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("game_bar_fps_enable").unwrap(), Some(SettingValue::Bool(true)));
        assert_eq!(reopened.get("game_bar_text_size").unwrap(), Some(SettingValue::Int(14)));
        assert_eq!(reopened.get("big").unwrap(), Some(SettingValue::Long(1 << 40)));
        assert_eq!(
            reopened.get("game_bar_position").unwrap(),
            Some(SettingValue::String("top_left".into()))
        );
    }

    #[test]
    fn creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("settings.json");
        let store = FileStore::open(&path).unwrap();
        store.commit(Edit::new().put("k", 1)).unwrap();
        assert!(path.is_file());
    }

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn no_temp_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let store = FileStore::open(&path).unwrap();
        store.commit(Edit::new().put("k", 1)).unwrap();
        store.commit(Edit::new().put("k", 2)).unwrap();
        assert_eq!(dir_entries(dir.path()), vec!["settings.json"]);
    }

    #[test]
    fn non_finite_float_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let store = FileStore::open(&path).unwrap();
        store.commit(Edit::new().put("game_bar_padding", 4)).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        for bad in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let err = store
                .commit(Edit::new().put("k", bad).put("game_bar_text_size", 14))
                .unwrap_err();
            assert!(matches!(err, StoreError::NonFiniteFloat { ref key } if key == "k"), "got: {err}");
        }

        assert_eq!(fs::read_to_string(&path).unwrap(), before);
        assert_eq!(store.get("k").unwrap(), None);
        assert_eq!(store.get("game_bar_text_size").unwrap(), None);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("game_bar_padding").unwrap(), Some(SettingValue::Int(4)));
    }

    #[test]
    fn finite_float_roundtrips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        FileStore::open(&path)
            .unwrap()
            .commit(Edit::new().put("scale", 1.5_f32))
            .unwrap();
        assert_eq!(
            FileStore::open(&path).unwrap().get("scale").unwrap(),
            Some(SettingValue::Float(1.5))
        );
    }

    #[test]
    fn independent_handles_commit_concurrently() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let path = path.clone();
                std::thread::spawn(move || {
                    let store = FileStore::open(&path).unwrap();
                    for round in 0..10 {
                        store.commit(Edit::new().put(format!("k{i}"), round)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert!(FileStore::open(&path).is_ok());
        assert_eq!(dir_entries(dir.path()), vec!["settings.json"]);
    }

    #[test]
    fn corrupt_file_fails_to_open() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }), "got: {err}");
    }

    #[test]
    fn empty_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "").unwrap();
        assert!(FileStore::open(&path).unwrap().keys().is_empty());
    }

    #[test]
    fn failed_commit_leaves_cache_untouched() {
        let dir = TempDir::new().unwrap();
        // The store path is a directory, so the final rename must fail.
        let path = dir.path().join("occupied");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("child"), "x").unwrap();

        let blocked = FileStore {
            path: path.clone(),
            values: RwLock::new(BTreeMap::new()),
        };
        assert!(blocked.commit(Edit::new().put("lost", 1)).is_err());
        assert_eq!(blocked.get("lost").unwrap(), None);
        assert_eq!(dir_entries(dir.path()), vec!["occupied"]);
    }
}
