//! Durable string key/value storage used by the layout and theme stores.
//!
//! Mirrors the `localStorage` surface. [`MemoryStorage`] backs tests and
//! native builds; the `hydrate` feature adds `browser::LocalStorage`.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::error::StorageError;

/// String key/value storage.
pub trait Storage {
    /// Read an item. Absent keys yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write an item, overwriting any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backend rejects the write.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove an item. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backend rejects the removal.
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Save `value` as JSON under `key`. Failures are logged and swallowed.
pub fn save_json<T: Serialize>(storage: &mut dyn Storage, key: &str, value: &T) {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(key, error = %e, "value could not be serialized");
            return;
        }
    };
    if let Err(e) = storage.set_item(key, &raw) {
        warn!(key, error = %e, "storage write failed");
    }
}

/// In-memory [`Storage`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}
