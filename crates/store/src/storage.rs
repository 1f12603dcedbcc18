//! Durable key-value storage
//!
//! Stores persist raw string values under fixed keys. Two backends are
//! provided: an in-memory map and a directory holding one file per key.

use crate::{Result, StoreError};
use std::collections::HashMap;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Key of the serialized note collection
pub const NOTES_KEY: &str = "noty-notes";

/// Key of the active note pointer
pub const ACTIVE_NOTE_KEY: &str = "noty-active-note";

/// Key of the freeform text buffer
pub const TEXT_KEY: &str = "noty-text";

/// Key of the theme preference
pub const THEME_KEY: &str = "theme";

/// A string key-value store
pub trait KeyValueStorage: Debug + Send + Sync {
    /// Read the value stored under `key`
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// Storage handle shared between stores and their write schedulers
pub type SharedStorage = Arc<dyn KeyValueStorage>;

/// In-memory storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage pre-filled with `items`
    pub fn with_items<I, K, V>(items: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let items = items
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            items: Mutex::new(items),
        }
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.items.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.lock().remove(key);
        Ok(())
    }
}

/// Storage keeping each key in its own file under a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open a storage directory, creating it if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The storage directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.store", key)))
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        // Write then rename so readers never see a partial value
        let tmp = path.with_extension("store.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item(TEXT_KEY).unwrap(), None);

        storage.set_item(TEXT_KEY, "hello").unwrap();
        assert_eq!(storage.get_item(TEXT_KEY).unwrap().as_deref(), Some("hello"));

        storage.remove_item(TEXT_KEY).unwrap();
        storage.remove_item(TEXT_KEY).unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::open(temp_dir.path().join("data")).unwrap();

        storage.set_item(NOTES_KEY, "[]").unwrap();
        storage.set_item(THEME_KEY, "light").unwrap();
        assert_eq!(storage.get_item(NOTES_KEY).unwrap().as_deref(), Some("[]"));

        // A second handle on the same directory sees the values
        let reopened = FileStorage::open(storage.dir()).unwrap();
        assert_eq!(reopened.get_item(THEME_KEY).unwrap().as_deref(), Some("light"));

        reopened.remove_item(THEME_KEY).unwrap();
        assert_eq!(storage.get_item(THEME_KEY).unwrap(), None);
        reopened.remove_item(THEME_KEY).unwrap();
    }

    #[test]
    fn test_file_storage_rejects_path_keys() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::open(temp_dir.path()).unwrap();

        assert!(matches!(
            storage.set_item("../escape", "x"),
            Err(StoreError::InvalidKey(_))
        ));
        assert!(matches!(storage.get_item(""), Err(StoreError::InvalidKey(_))));
    }
}
