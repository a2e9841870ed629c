//! Preset manager: create, list, load, rename, delete, export and import.
//!
//! # Storage Layout
//!
//! | key | value |
//! |-----|-------|
//! | `gamebar_preset_list` | JSON array of preset ids |
//! | `gamebar_presets_<id>` | JSON preset payload |
//! | `game_bar_*` | live overlay settings |
//!
//! # Consistency
//!
//! A payload exists iff its id is in the index. Operations that create or
//! destroy a preset write the payload and the updated index in a single
//! [`Edit`], so the two can never be observed out of step. Mutating
//! operations additionally hold a manager-wide lock around their
//! read-modify-write of the index, so concurrent saves on one manager cannot
//! drop each other's ids.

use parking_lot::Mutex;
use std::cmp::Reverse;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use crate::error::PresetError;
use crate::index::{INDEX_KEY, PresetIndex, payload_key};
use crate::keys::TRACKED_KEYS;
use crate::notify::ApplySettings;
use crate::preset::{Preset, generate_id};
use crate::store::{Edit, KeyValueStore};

/// Manages presets stored in a [`KeyValueStore`].
///
/// The store handle is shared: every manager built from clones of the same
/// `Arc` sees the same presets and live settings.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use gamebar_presets::{Edit, KeyValueStore, MemoryStore, PresetManager, SettingValue};
///
/// let store = Arc::new(MemoryStore::new());
/// store.commit(Edit::new().put("game_bar_fps_enable", true)).unwrap();
///
/// let manager = PresetManager::new(Arc::clone(&store));
/// let preset = manager.save("Benchmark").unwrap();
///
/// store.commit(Edit::new().put("game_bar_fps_enable", false)).unwrap();
/// manager.load(&preset.id).unwrap();
/// assert_eq!(store.get("game_bar_fps_enable").unwrap(), Some(SettingValue::Bool(true)));
/// ```
pub struct PresetManager<S: KeyValueStore> {
    store: Arc<S>,
    notifier: Option<Arc<dyn ApplySettings>>,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> PresetManager<S> {
    /// Create a manager over `store` with no apply-settings collaborator.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            notifier: None,
            write_lock: Mutex::new(()),
        }
    }

    /// Attach the collaborator notified after `load` and `reset_to_defaults`.
    pub fn with_notifier(mut self, notifier: Arc<dyn ApplySettings>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// The underlying store handle.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// All readable presets, newest first.
    ///
    /// Best effort: a payload that is missing, unreadable or malformed is
    /// skipped with a warning, and a corrupt index lists as empty.
    pub fn list(&self) -> Vec<Preset> {
        let index = match PresetIndex::read(&*self.store) {
            Ok(index) => index,
            Err(e) => {
                tracing::warn!(error = %e, "cannot read preset index, listing nothing");
                return Vec::new();
            }
        };

        let mut presets: Vec<Preset> = index
            .iter()
            .filter_map(|id| match self.read_preset(id) {
                Ok(preset) => Some(preset),
                Err(e) => {
                    tracing::warn!(id = %id, error = %e, "skipping unreadable preset");
                    None
                }
            })
            .collect();

        presets.sort_by_key(|p| Reverse(p.created_date.clone()));
        presets
    }

    /// Read a single preset.
    pub fn get(&self, id: &str) -> Result<Preset, PresetError> {
        report("get", id, self.read_preset(id), |p| {
            tracing::debug!(id = %p.id, name = %p.name, "read preset");
        })
    }

    /// Capture the current tracked settings as a new preset named `name`.
    ///
    /// Absent keys are omitted from the snapshot. A key holding a value of
    /// the wrong kind is skipped with a warning, since it could never be
    /// restored.
    pub fn save(&self, name: &str) -> Result<Preset, PresetError> {
        let result = self.capture(name).and_then(|preset| {
            self.insert(&preset)?;
            Ok(preset)
        });
        report("save", name, result, |p| {
            tracing::info!(id = %p.id, name = %p.name, settings = p.len(), "saved preset");
        })
    }

    /// Write every setting of preset `id` into the live store.
    ///
    /// The payload is fully decoded and validated before anything is
    /// written; all settings land in one commit. The apply-settings
    /// collaborator, if any, is then told to reload exactly once and, if the
    /// overlay is showing, cycled hidden and visible again.
    pub fn load(&self, id: &str) -> Result<(), PresetError> {
        let result = self.read_preset(id).and_then(|preset| {
            let edit = preset
                .settings
                .iter()
                .fold(Edit::new(), |edit, (key, value)| edit.put(key.as_str(), value.clone()));
            self.store.commit(edit)?;
            Ok(preset)
        });
        report("load", id, result, |p| {
            tracing::info!(id = %p.id, name = %p.name, settings = p.len(), "loaded preset");
        })?;

        if let Some(notifier) = &self.notifier {
            notifier.apply_preferences();
            if notifier.is_showing() {
                notifier.hide();
                notifier.show();
            }
        }
        Ok(())
    }

    /// Delete preset `id`. Deleting an unknown id succeeds.
    ///
    /// Payload and index entry are removed in one commit; if it fails,
    /// neither changes.
    pub fn delete(&self, id: &str) -> Result<(), PresetError> {
        report("delete", id, self.remove(id), |was_indexed| {
            tracing::info!(id = %id, was_indexed, "deleted preset");
        })
        .map(|_| ())
    }

    /// Write the stored payload of preset `id` to `destination`, unchanged.
    pub fn export(&self, id: &str, destination: impl AsRef<Path>) -> Result<(), PresetError> {
        let destination = destination.as_ref();
        report("export", id, self.write_payload(id, destination), |bytes| {
            tracing::info!(id = %id, path = %destination.display(), bytes, "exported preset");
        })
        .map(|_| ())
    }

    /// Import a preset file as a new preset.
    ///
    /// The file must decode as a preset before anything is written. The
    /// imported preset gets a fresh id, so importing the same file twice
    /// yields two independent presets. Name, creation date and settings are
    /// kept; untracked keys are dropped.
    pub fn import(&self, source: impl AsRef<Path>) -> Result<Preset, PresetError> {
        let source = source.as_ref();
        let result = Preset::load(source).and_then(|mut preset| {
            preset.id = generate_id();
            self.insert(&preset)?;
            Ok(preset)
        });
        report("import", &source.display().to_string(), result, |p| {
            tracing::info!(id = %p.id, name = %p.name, path = %source.display(), "imported preset");
        })
    }

    /// Change the display name of preset `id`. The index is untouched.
    pub fn rename(&self, id: &str, new_name: &str) -> Result<Preset, PresetError> {
        report("rename", id, self.set_name(id, new_name), |p| {
            tracing::info!(id = %p.id, name = %p.name, "renamed preset");
        })
    }

    /// Remove every tracked key from the live store.
    ///
    /// Presets are untouched. The apply-settings collaborator, if any, is
    /// told to reload so it falls back to its built-in defaults.
    pub fn reset_to_defaults(&self) -> Result<(), PresetError> {
        let edit = TRACKED_KEYS
            .iter()
            .fold(Edit::new(), |edit, key| edit.remove(key.name));
        let result = self.store.commit(edit).map_err(PresetError::from);
        report("reset", "defaults", result, |()| {
            tracing::info!(keys = TRACKED_KEYS.len(), "reset settings to defaults");
        })?;

        if let Some(notifier) = &self.notifier {
            notifier.apply_preferences();
        }
        Ok(())
    }

    fn read_preset(&self, id: &str) -> Result<Preset, PresetError> {
        let payload = self
            .store
            .get_string(&payload_key(id))?
            .ok_or_else(|| PresetError::PresetNotFound(id.to_string()))?;
        Preset::from_json(&payload)
    }

    fn capture(&self, name: &str) -> Result<Preset, PresetError> {
        let mut preset = Preset::new(generate_id(), name);
        for key in TRACKED_KEYS {
            let Some(value) = self.store.get(key.name)? else {
                continue;
            };
            if value.kind() != key.kind {
                tracing::warn!(
                    key = key.name,
                    expected = %key.kind,
                    found = %value.kind(),
                    "not capturing setting of unexpected kind"
                );
                continue;
            }
            preset.settings.insert(key.name.to_string(), value);
        }
        Ok(preset)
    }

    /// Write `preset` and add it to the index in one commit.
    fn insert(&self, preset: &Preset) -> Result<(), PresetError> {
        let payload = preset.to_json()?;

        let _guard = self.write_lock.lock();
        let mut index = PresetIndex::read(&*self.store)?;
        index.insert(preset.id.as_str());
        self.store.commit(
            Edit::new()
                .put(payload_key(&preset.id), payload)
                .put(INDEX_KEY, index.to_value()),
        )?;
        Ok(())
    }

    /// Drop payload and index entry of `id` in one commit.
    ///
    /// Returns whether `id` was indexed.
    fn remove(&self, id: &str) -> Result<bool, PresetError> {
        let _guard = self.write_lock.lock();
        let mut index = PresetIndex::read(&*self.store)?;
        let was_indexed = index.remove(id);
        self.store.commit(
            Edit::new()
                .remove(payload_key(id))
                .put(INDEX_KEY, index.to_value()),
        )?;
        Ok(was_indexed)
    }

    fn set_name(&self, id: &str, new_name: &str) -> Result<Preset, PresetError> {
        let _guard = self.write_lock.lock();
        let mut preset = self.read_preset(id)?;
        preset.name = new_name.to_string();
        self.store
            .commit(Edit::new().put(payload_key(id), preset.to_json()?))?;
        Ok(preset)
    }

    /// Copy the raw payload of `id` into `destination`. Returns bytes written.
    fn write_payload(&self, id: &str, destination: &Path) -> Result<usize, PresetError> {
        let payload = self
            .store
            .get_string(&payload_key(id))?
            .ok_or_else(|| PresetError::PresetNotFound(id.to_string()))?;

        let mut file =
            File::create(destination).map_err(|e| PresetError::write_file(destination, e))?;
        file.write_all(payload.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| PresetError::write_file(destination, e))?;
        Ok(payload.len())
    }
}

impl<S: KeyValueStore> std::fmt::Debug for PresetManager<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresetManager")
            .field("notifier", &self.notifier.is_some())
            .finish_non_exhaustive()
    }
}

/// Log the outcome of an operation at its boundary.
fn report<T>(
    op: &'static str,
    subject: &str,
    result: Result<T, PresetError>,
    on_success: impl FnOnce(&T),
) -> Result<T, PresetError> {
    match &result {
        Ok(value) => on_success(value),
        Err(e) => tracing::error!(op, subject = %subject, kind = ?e.kind(), error = %e, "preset operation failed"),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, StoreError};
    use crate::store::MemoryStore;
    use crate::value::SettingValue;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Store wrapper whose commits can be made to fail.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_commits: AtomicBool,
    }

    impl FlakyStore {
        fn set_failing(&self, failing: bool) {
            self.fail_commits.store(failing, Ordering::SeqCst);
        }
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<SettingValue>, StoreError> {
            self.inner.get(key)
        }

        fn commit(&self, edit: Edit) -> Result<(), StoreError> {
            if self.fail_commits.load(Ordering::SeqCst) {
                return Err(StoreError::io(
                    "flaky",
                    std::io::Error::other("injected failure"),
                ));
            }
            self.inner.commit(edit)
        }
    }

    #[derive(Default)]
    struct RecordingOverlay {
        showing: AtomicBool,
        calls: Mutex<Vec<&'static str>>,
        applies: AtomicUsize,
    }

    impl ApplySettings for RecordingOverlay {
        fn apply_preferences(&self) {
            self.applies.fetch_add(1, Ordering::SeqCst);
            self.calls.lock().push("apply");
        }

        fn is_showing(&self) -> bool {
            self.showing.load(Ordering::SeqCst)
        }

        fn hide(&self) {
            self.calls.lock().push("hide");
        }

        fn show(&self) {
            self.calls.lock().push("show");
        }
    }

    /// Log sink shared with a scoped `fmt` subscriber.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture_logs(f: impl FnOnce()) -> String {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = logs.0.lock().clone();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn seeded() -> (Arc<MemoryStore>, PresetManager<MemoryStore>) {
        let store = Arc::new(MemoryStore::with_values([
            ("game_bar_fps_enable", SettingValue::Bool(true)),
            ("game_bar_text_size", SettingValue::Int(14)),
        ]));
        let manager = PresetManager::new(Arc::clone(&store));
        (store, manager)
    }

    #[test]
    fn save_captures_only_present_tracked_keys() {
        let (store, manager) = seeded();
        store.commit(Edit::new().put("unrelated", "x")).unwrap();

        let preset = manager.save("A").unwrap();
        assert_eq!(preset.name, "A");
        assert_eq!(preset.len(), 2);
        assert_eq!(preset.get("game_bar_fps_enable"), Some(&SettingValue::Bool(true)));
        assert_eq!(preset.get("game_bar_text_size"), Some(&SettingValue::Int(14)));
        assert!(preset.get("unrelated").is_none());

        let index = PresetIndex::read(&*store).unwrap();
        assert!(index.contains(&preset.id));
        assert!(store.get(&payload_key(&preset.id)).unwrap().is_some());
    }

    #[test]
    fn save_skips_mistyped_value() {
        let (store, manager) = seeded();
        store.commit(Edit::new().put("game_bar_padding", "wide")).unwrap();
        let preset = manager.save("A").unwrap();
        assert!(preset.get("game_bar_padding").is_none());
    }

    #[test]
    fn load_restores_saved_values() {
        let (store, manager) = seeded();
        let preset = manager.save("A").unwrap();

        store
            .commit(Edit::new().put("game_bar_fps_enable", false).put("game_bar_padding", 4))
            .unwrap();
        manager.load(&preset.id).unwrap();

        assert_eq!(store.get("game_bar_fps_enable").unwrap(), Some(SettingValue::Bool(true)));
        // Absent at save time, so left alone.
        assert_eq!(store.get("game_bar_padding").unwrap(), Some(SettingValue::Int(4)));
    }

    #[test]
    fn load_unknown_id_fails_not_found() {
        let (_, manager) = seeded();
        let err = manager.load("missing").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn load_with_bad_setting_writes_nothing() {
        let (store, manager) = seeded();
        let payload = r#"{"id":"bad","name":"n","createdDate":"2025-01-01 00:00:00",
            "settings":{"game_bar_padding":9,"game_bar_fps_enable":"nope"}}"#;
        store.commit(Edit::new().put(payload_key("bad"), payload)).unwrap();

        let err = manager.load("bad").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedPayload);
        assert_eq!(store.get("game_bar_padding").unwrap(), None);
    }

    #[test]
    fn load_notifies_once_and_cycles_visible_overlay() {
        let (store, _) = seeded();
        let overlay = Arc::new(RecordingOverlay::default());
        overlay.showing.store(true, Ordering::SeqCst);
        let manager = PresetManager::new(store).with_notifier(overlay.clone());

        let preset = manager.save("A").unwrap();
        manager.load(&preset.id).unwrap();

        assert_eq!(overlay.applies.load(Ordering::SeqCst), 1);
        assert_eq!(*overlay.calls.lock(), vec!["apply", "hide", "show"]);
    }

    #[test]
    fn load_does_not_cycle_hidden_overlay() {
        let (store, _) = seeded();
        let overlay = Arc::new(RecordingOverlay::default());
        let manager = PresetManager::new(store).with_notifier(overlay.clone());

        let preset = manager.save("A").unwrap();
        manager.load(&preset.id).unwrap();
        assert_eq!(*overlay.calls.lock(), vec!["apply"]);
    }

    #[test]
    fn failed_load_does_not_notify() {
        let (store, _) = seeded();
        let overlay = Arc::new(RecordingOverlay::default());
        let manager = PresetManager::new(store).with_notifier(overlay.clone());
        assert!(manager.load("missing").is_err());
        assert!(overlay.calls.lock().is_empty());
    }

    #[test]
    fn failed_get_is_logged_like_other_operations() {
        let (_, manager) = seeded();
        let logs = capture_logs(|| {
            assert!(manager.get("missing").unwrap_err().is_not_found());
            assert!(manager.load("missing").is_err());
        });

        let failures: Vec<&str> = logs
            .lines()
            .filter(|line| line.contains("ERROR") && line.contains("preset operation failed"))
            .collect();
        assert_eq!(failures.len(), 2, "logs: {logs}");
        assert!(failures[0].contains("op=\"get\""), "logs: {logs}");
        assert!(failures[0].contains("missing"), "logs: {logs}");
        assert!(failures[1].contains("op=\"load\""), "logs: {logs}");
    }

    #[test]
    fn delete_is_idempotent() {
        let (store, manager) = seeded();
        let preset = manager.save("A").unwrap();

        manager.delete(&preset.id).unwrap();
        manager.delete(&preset.id).unwrap();
        manager.delete("never-existed").unwrap();

        assert!(!PresetIndex::read(&*store).unwrap().contains(&preset.id));
        assert_eq!(store.get(&payload_key(&preset.id)).unwrap(), None);
    }

    #[test]
    fn failed_delete_changes_nothing() {
        let store = Arc::new(FlakyStore::default());
        let manager = PresetManager::new(Arc::clone(&store));
        let preset = manager.save("A").unwrap();

        store.set_failing(true);
        assert_eq!(manager.delete(&preset.id).unwrap_err().kind(), ErrorKind::Io);
        store.set_failing(false);

        assert!(PresetIndex::read(&*store).unwrap().contains(&preset.id));
        assert!(manager.get(&preset.id).is_ok());
    }

    #[test]
    fn failed_save_leaves_no_orphan() {
        let store = Arc::new(FlakyStore::default());
        let manager = PresetManager::new(Arc::clone(&store));
        store.set_failing(true);

        assert!(manager.save("A").is_err());
        store.set_failing(false);

        assert!(PresetIndex::read(&*store).unwrap().is_empty());
        assert!(store.inner.is_empty());
    }

    #[test]
    fn mutations_refuse_corrupt_index() {
        let (store, manager) = seeded();
        store.commit(Edit::new().put(INDEX_KEY, "not an array")).unwrap();

        assert_eq!(manager.save("A").unwrap_err().kind(), ErrorKind::MalformedPayload);
        assert_eq!(manager.delete("x").unwrap_err().kind(), ErrorKind::MalformedPayload);
        assert!(manager.list().is_empty());
        assert_eq!(store.get_string(INDEX_KEY).unwrap().as_deref(), Some("not an array"));
    }

    #[test]
    fn list_sorts_newest_first_and_skips_corrupt() {
        let store = Arc::new(MemoryStore::new());
        let manager = PresetManager::new(Arc::clone(&store));

        for (id, date) in [("old", "2024-01-01 00:00:00"), ("new", "2025-06-01 12:00:00")] {
            let preset = Preset::new(id, id).with_created_date(date);
            manager.insert(&preset).unwrap();
        }
        let mut index = PresetIndex::read(&*store).unwrap();
        index.insert("broken");
        index.insert("ghost");
        store
            .commit(
                Edit::new()
                    .put(payload_key("broken"), "{")
                    .put(INDEX_KEY, index.to_value()),
            )
            .unwrap();

        let names: Vec<_> = manager.list().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["new", "old"]);
    }

    #[test]
    fn rename_changes_only_name() {
        let (store, manager) = seeded();
        let preset = manager.save("A").unwrap();
        let before = PresetIndex::read(&*store).unwrap();

        let renamed = manager.rename(&preset.id, "B").unwrap();
        assert_eq!(renamed.name, "B");
        assert_eq!(renamed.id, preset.id);
        assert_eq!(renamed.created_date, preset.created_date);
        assert_eq!(renamed.settings, preset.settings);
        assert_eq!(PresetIndex::read(&*store).unwrap(), before);
        assert_eq!(manager.get(&preset.id).unwrap().name, "B");
    }

    #[test]
    fn rename_unknown_fails() {
        let (_, manager) = seeded();
        assert!(manager.rename("missing", "B").unwrap_err().is_not_found());
    }

    #[test]
    fn reset_clears_tracked_keys_only() {
        let (store, _) = seeded();
        let overlay = Arc::new(RecordingOverlay::default());
        overlay.showing.store(true, Ordering::SeqCst);
        let manager = PresetManager::new(Arc::clone(&store)).with_notifier(overlay.clone());
        store.commit(Edit::new().put("game_bar_enable", true)).unwrap();
        let preset = manager.save("keep").unwrap();

        manager.reset_to_defaults().unwrap();

        assert_eq!(store.get("game_bar_fps_enable").unwrap(), None);
        assert_eq!(store.get("game_bar_text_size").unwrap(), None);
        assert_eq!(store.get("game_bar_enable").unwrap(), Some(SettingValue::Bool(true)));
        assert!(manager.get(&preset.id).is_ok());
        assert_eq!(*overlay.calls.lock(), vec!["apply"]);
    }

    #[test]
    fn export_unknown_fails_without_creating_file() {
        let (_, manager) = seeded();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        assert!(manager.export("missing", &path).unwrap_err().is_not_found());
        assert!(!path.exists());
    }

    #[test]
    fn concurrent_saves_keep_every_id() {
        let (store, manager) = seeded();
        let manager = Arc::new(manager);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let manager = Arc::clone(&manager);
                std::thread::spawn(move || manager.save(&format!("p{i}")).unwrap().id)
            })
            .collect();
        let ids: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let index = PresetIndex::read(&*store).unwrap();
        assert_eq!(index.len(), 8);
        assert!(ids.iter().all(|id| index.contains(id)));
    }
}
