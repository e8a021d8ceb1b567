use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::error::StoreError;

/// Key/value persistence for local UI state.
///
/// Reads are best effort: a missing or unreadable entry is `None`, never an error.
pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Decode a JSON-encoded entry, falling back to `None` when absent or malformed.
pub fn get_json<T: DeserializeOwned>(store: &dyn LocalStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key, %err, "ignoring malformed stored value");
            None
        }
    }
}

pub fn set_json<T: Serialize>(store: &dyn LocalStore, key: &str, value: &T) -> Result<(), StoreError> {
    let encoded = serde_json::to_string(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &encoded)
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries().remove(key);
        Ok(())
    }
}

/// A single JSON object on disk.
///
/// Every read goes back to the file so edits made by another process show up on
/// the next `get`. Writes reload, apply the change and rewrite the whole object.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub const FILE_NAME: &'static str = "storage.json";

    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> BTreeMap<String, String> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(err) => {
                debug!(path = %self.path.display(), %err, "stored state unreadable, using defaults");
                return BTreeMap::new();
            }
        };

        serde_json::from_str(&contents).unwrap_or_else(|err| {
            warn!(path = %self.path.display(), %err, "stored state is corrupt, using defaults");
            BTreeMap::new()
        })
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Apply `change` to the current on-disk entries and write them back.
    fn update(&self, change: impl FnOnce(&mut BTreeMap<String, String>) -> bool) -> Result<(), StoreError> {
        let _guard = self.lock();
        let mut entries = self.load();
        if change(&mut entries) {
            self.flush(&entries)?;
        }
        Ok(())
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let json = serde_json::to_string_pretty(entries).map_err(|source| StoreError::Encode {
            key: self.path.display().to_string(),
            source,
        })?;

        // Write beside the target and rename so readers never see a partial file.
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, json).map_err(write_err)?;
        fs::rename(&staging, &self.path).map_err(write_err)
    }
}

impl LocalStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.load().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.update(|entries| entries.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join(FileStore::FILE_NAME);

        let store = FileStore::open(&path);
        store.set("ethRpc", "http://localhost:8545").expect("write");
        drop(store);

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("ethRpc").as_deref(), Some("http://localhost:8545"));
    }

    #[test]
    fn stores_sharing_a_file_see_each_others_writes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(FileStore::FILE_NAME);

        let dashboard = FileStore::open(&path);
        let settings = FileStore::open(&path);
        dashboard.set("theme-mode", "dark").expect("write");

        settings.set("ethRpc", "http://edited:8545").expect("write");
        assert_eq!(dashboard.get("ethRpc").as_deref(), Some("http://edited:8545"));

        dashboard.set("graphApi", "http://edited:8000").expect("write");
        assert_eq!(settings.get("ethRpc").as_deref(), Some("http://edited:8545"));
        assert_eq!(settings.get("theme-mode").as_deref(), Some("dark"));

        settings.remove("ethRpc").expect("remove");
        assert_eq!(dashboard.get("ethRpc"), None);
        assert_eq!(dashboard.get("graphApi").as_deref(), Some("http://edited:8000"));
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(FileStore::FILE_NAME);
        fs::write(&path, "{not json").expect("write");

        let store = FileStore::open(&path);
        assert_eq!(store.get("ethRpc"), None);
    }

    #[test]
    fn malformed_json_entries_fall_back_to_none() {
        let store = MemoryStore::new();
        store.set("nounsProfile", "[1, 2").expect("write");
        let decoded: Option<serde_json::Value> = get_json(&store, "nounsProfile");
        assert!(decoded.is_none());
    }
}
