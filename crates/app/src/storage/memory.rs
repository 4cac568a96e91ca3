//! In-memory store.

use std::sync::Mutex;

use rustc_hash::FxHashMap;

use crate::storage::{LocalStore, StoreError};

/// Store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<FxHashMap<String, String>>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `entries`.
    #[must_use]
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        Self {
            entries: Mutex::new(entries),
        }
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_poisoned| StoreError::Poisoned)?;

        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_poisoned| StoreError::Poisoned)?;

        entries.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_poisoned| StoreError::Poisoned)?;

        entries.remove(key);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn set_then_get_returns_value() -> TestResult {
        let store = MemoryStore::new();

        store.set("key", "value")?;

        assert_eq!(store.get("key")?.as_deref(), Some("value"));

        Ok(())
    }

    #[test]
    fn remove_missing_key_is_not_an_error() -> TestResult {
        let store = MemoryStore::with_entries([("a", "1")]);

        store.remove("b")?;
        store.remove("a")?;

        assert_eq!(store.get("a")?, None);

        Ok(())
    }
}
