//! File-backed store.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing::{debug, warn};

use crate::storage::{LocalStore, StoreError};

const STORE_FILE_NAME: &str = "local_storage.json";

type Entries = BTreeMap<String, String>;

/// Store persisted as a single JSON object inside a data directory.
///
/// Content that is not a JSON object of strings is treated as empty rather
/// than as an error, so a damaged file never blocks the cart.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Open (or lazily create) the store inside `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref();

        fs::create_dir_all(dir)?;

        Ok(Self {
            path: dir.join(STORE_FILE_NAME),
            lock: Mutex::new(()),
        })
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Entries, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Entries::new()),
            Err(error) => return Err(error.into()),
        };

        if raw.trim().is_empty() {
            return Ok(Entries::new());
        }

        match serde_json::from_str::<Entries>(&raw) {
            Ok(entries) => Ok(entries),
            Err(error) => {
                warn!(path = %self.path.display(), "ignoring unreadable local storage: {error}");

                Ok(Entries::new())
            }
        }
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), StoreError> {
        let encoded = serde_json::to_string_pretty(entries)?;
        let staging = self.path.with_extension("json.tmp");

        fs::write(&staging, encoded)?;
        fs::rename(&staging, &self.path)?;

        debug!(path = %self.path.display(), keys = entries.len(), "wrote local storage");

        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut Entries)) -> Result<(), StoreError> {
        let _guard = self.lock.lock().map_err(|_poisoned| StoreError::Poisoned)?;

        let mut entries = self.read_entries()?;

        apply(&mut entries);

        self.write_entries(&entries)
    }
}

impl LocalStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().map_err(|_poisoned| StoreError::Poisoned)?;

        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn missing_file_reads_as_empty() -> TestResult {
        let dir = tempdir()?;
        let store = FileStore::open(dir.path())?;

        assert_eq!(store.get("anything")?, None);

        Ok(())
    }

    #[test]
    fn values_survive_reopening() -> TestResult {
        let dir = tempdir()?;

        FileStore::open(dir.path())?.set("shoptech_user_token", "abc")?;

        let reopened = FileStore::open(dir.path())?;

        assert_eq!(reopened.get("shoptech_user_token")?.as_deref(), Some("abc"));

        Ok(())
    }

    #[test]
    fn corrupt_file_is_treated_as_empty_and_overwritten() -> TestResult {
        let dir = tempdir()?;
        let store = FileStore::open(dir.path())?;

        fs::write(store.path(), "{not json")?;

        assert_eq!(store.get("key")?, None);

        store.set("key", "value")?;

        assert_eq!(store.get("key")?.as_deref(), Some("value"));

        Ok(())
    }

    #[test]
    fn remove_deletes_only_the_given_key() -> TestResult {
        let dir = tempdir()?;
        let store = FileStore::open(dir.path())?;

        store.set("a", "1")?;
        store.set("b", "2")?;
        store.remove("a")?;

        assert_eq!(store.get("a")?, None);
        assert_eq!(store.get("b")?.as_deref(), Some("2"));

        Ok(())
    }
}
