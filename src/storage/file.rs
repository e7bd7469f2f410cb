use super::{KeyValueStore, StorageError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// JSON-file backed store. The whole map is rewritten on every change.
pub struct FileStore {
    path: PathBuf,
    // serializes read-modify-write within this process
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// `<config dir>/gipoly/store.json`
    pub fn default_location() -> Self {
        Self::new(crate::settings::data_dir().join("store.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = std::fs::read_to_string(&self.path)?;
        let entries = serde_json::from_str(&contents)?;
        Ok(entries)
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, contents)?;

        log::debug!("Store saved to {:?}", self.path);
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("store.json"));
        assert_eq!(store.get("gipoly-token").unwrap(), None);
    }

    #[test]
    fn test_values_survive_a_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        FileStore::new(&path).set("gipoly-language", "tr").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("gipoly-language").unwrap().as_deref(), Some("tr"));
    }

    #[test]
    fn test_remove_only_touches_one_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("store.json"));
        store.set("gipoly-token", "abc123").unwrap();
        store.set("gipoly-language", "en").unwrap();

        store.remove("gipoly-token").unwrap();
        store.remove("gipoly-token").unwrap();

        assert_eq!(store.get("gipoly-token").unwrap(), None);
        assert_eq!(store.get("gipoly-language").unwrap().as_deref(), Some("en"));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(store.get("gipoly-token"), Err(StorageError::SerdeError(_))));
    }
}
