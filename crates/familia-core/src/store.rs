//! Persistent key-value store adapter.
//!
//! Backends implement [`KeyValueStore`] over raw strings. [`Store`] wraps a
//! backend and speaks JSON: `save` reports success as a `bool` and `load`
//! falls back to the caller's default, so storage problems degrade instead of
//! propagating.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::StoreError;

/// A raw string key-value backend.
pub trait KeyValueStore: Send + Sync {
    /// Fetch the raw text stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store raw text under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// JSON adapter over a [`KeyValueStore`] backend.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn KeyValueStore>,
}

impl Store {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// A store backed by a fresh [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Serialize `value` and store it under `key`.
    ///
    /// Returns `false` (after logging) when serialization or the backend fails.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let text = match serde_json::to_string(value) {
            Ok(text) => text,
            Err(e) => {
                warn!(key, error = %e, "failed to serialize value for storage");
                return false;
            }
        };

        match self.backend.set(key, &text) {
            Ok(()) => {
                debug!(key, bytes = text.len(), "saved to storage");
                true
            }
            Err(e) => {
                warn!(key, error = %e, "failed to save to storage");
                false
            }
        }
    }

    /// Load and deserialize the value under `key`, or return `default` when
    /// it is absent, unparsable or the backend is unavailable.
    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let Some(text) = self.read(key) else {
            return default;
        };

        match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "failed to parse stored value, using default");
                default
            }
        }
    }

    /// Load the value under `key` as untyped JSON, for callers that normalize
    /// untrusted shapes themselves.
    pub fn load_raw(&self, key: &str) -> Option<Value> {
        let text = self.read(key)?;
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "failed to parse stored value");
                None
            }
        }
    }

    /// The raw text stored under `key`, without parsing.
    pub fn load_text(&self, key: &str) -> Option<String> {
        self.read(key)
    }

    /// Delete `key`. Returns `false` (after logging) on backend failure.
    pub fn remove(&self, key: &str) -> bool {
        match self.backend.remove(key) {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "failed to remove from storage");
                false
            }
        }
    }

    /// The raw text under `key`. Unlike [`load`](Self::load), a backend
    /// failure is an error rather than an absent key.
    pub fn try_load_text(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.backend.get(key) {
            // An empty blob counts as absent.
            Ok(Some(text)) if !text.is_empty() => Ok(Some(text)),
            Ok(_) => Ok(None),
            Err(StoreError::Unavailable) => {
                debug!(key, "storage unavailable");
                Err(StoreError::Unavailable)
            }
            Err(e) => {
                warn!(key, error = %e, "failed to load from storage");
                Err(e)
            }
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        self.try_load_text(key).ok().flatten()
    }
}

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

/// In-memory backend with an optional byte quota (keys + values).
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes that would push the total stored bytes past `quota`.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            quota: Some(quota),
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(quota) = self.quota {
            let used: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum::<usize>()
                + key.len()
                + value.len();
            if used > quota {
                return Err(StoreError::QuotaExceeded { used, quota });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// File backend
// ---------------------------------------------------------------------------

/// Directory-backed store: one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        // Write-then-rename keeps a crash from leaving a half-written blob.
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Unavailable backend
// ---------------------------------------------------------------------------

/// A backend for contexts with no storage at all. Every call fails with
/// [`StoreError::Unavailable`].
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable)
    }

    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn save_then_load_roundtrip() {
        let store = Store::in_memory();
        let mut map = BTreeMap::new();
        map.insert("a".to_string(), vec![1, 2, 3]);

        assert!(store.save("numbers", &map));
        let loaded: BTreeMap<String, Vec<i32>> = store.load("numbers", BTreeMap::new());
        assert_eq!(loaded, map);
    }

    #[test]
    fn missing_key_returns_default() {
        let store = Store::in_memory();
        assert_eq!(store.load("nope", 42u32), 42);
        assert!(store.load_raw("nope").is_none());
    }

    #[test]
    fn unparsable_value_returns_default() {
        let backend = Arc::new(MemoryStore::new());
        backend.set("broken", "{not json").unwrap();
        let store = Store::new(backend);

        assert_eq!(store.load("broken", String::from("fallback")), "fallback");
        assert!(store.load_raw("broken").is_none());
    }

    #[test]
    fn wrong_shape_returns_default() {
        let store = Store::in_memory();
        assert!(store.save("flag", &"not a bool"));
        assert!(!store.load("flag", false));
    }

    #[test]
    fn empty_blob_counts_as_absent() {
        let backend = Arc::new(MemoryStore::new());
        backend.set("empty", "").unwrap();
        let store = Store::new(backend);
        assert_eq!(store.load("empty", 7u8), 7);
    }

    #[test]
    fn quota_exceeded_reports_false_and_keeps_old_value() {
        let store = Store::new(Arc::new(MemoryStore::with_quota(20)));
        assert!(store.save("k", &"short"));
        assert!(!store.save("k", &"this value is far too long for the quota"));
        assert_eq!(store.load("k", String::new()), "short");
    }

    #[test]
    fn unavailable_store_degrades() {
        let store = Store::new(Arc::new(UnavailableStore));
        assert!(!store.save("theme", &true));
        assert!(!store.load("theme", false));
        assert!(store.load_raw("theme").is_none());
        assert!(!store.remove("theme"));
    }

    #[test]
    fn remove_deletes_value() {
        let store = Store::in_memory();
        assert!(store.save("gone", &1));
        assert!(store.remove("gone"));
        assert_eq!(store.load("gone", 0), 0);
        assert!(store.remove("gone"));
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = Store::new(Arc::new(FileStore::open(dir.path()).unwrap()));
            assert!(store.save("lastActiveDate", &"2024-03-01"));
        }
        let store = Store::new(Arc::new(FileStore::open(dir.path()).unwrap()));
        assert_eq!(store.load("lastActiveDate", String::new()), "2024-03-01");
        assert!(dir.path().join("lastActiveDate.json").exists());
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileStore::open(dir.path()).unwrap();
        assert!(matches!(
            backend.set("../escape", "1"),
            Err(StoreError::InvalidKey(_))
        ));
        assert!(matches!(backend.get(""), Err(StoreError::InvalidKey(_))));
        assert!(matches!(
            backend.get(".hidden"),
            Err(StoreError::InvalidKey(_))
        ));
    }

    #[test]
    fn failed_read_is_not_absent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("dailyStats.json"), b"{\"a\xf1\": 1}").unwrap();
        let store = Store::new(Arc::new(FileStore::open(dir.path()).unwrap()));

        assert!(matches!(
            store.try_load_text("dailyStats"),
            Err(StoreError::Io(_))
        ));
        assert!(store.load_raw("dailyStats").is_none());
        assert_eq!(store.try_load_text("missing").unwrap(), None);

        let store = Store::new(Arc::new(UnavailableStore));
        assert!(matches!(
            store.try_load_text("dailyStats"),
            Err(StoreError::Unavailable)
        ));
    }

    #[test]
    fn file_store_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileStore::open(dir.path().join("nested")).unwrap();
        assert!(backend.get("dailyStats").unwrap().is_none());
        backend.remove("dailyStats").unwrap();
    }
}
