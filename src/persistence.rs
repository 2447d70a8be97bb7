//! Persistence adapter for toggle state flags.
//!
//! A toggle created with `save_state` mirrors every transition here: enabling
//! writes `attribute -> "on"`, disabling deletes the flag. In the browser the
//! flags live in cookies (`browser::CookiePersistence`); natively
//! [`MemoryPersistence`] keeps them in a map.

#[cfg(test)]
#[path = "persistence_test.rs"]
mod persistence_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Options attached to a persisted flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersistOptions {
    /// Path scope of the flag (cookie `path`).
    pub path: Option<String>,
    /// Lifetime in seconds (cookie `max-age`). `None` keeps it for the session.
    pub max_age_secs: Option<u64>,
}

/// Durable flag storage.
pub trait Persistence {
    /// Current value of a flag.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a flag.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backend rejects the write.
    fn set(&mut self, key: &str, value: &str, options: &PersistOptions) -> Result<(), StorageError>;

    /// Delete a flag. Deleting an absent flag is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backend rejects the deletion.
    fn delete(&mut self, key: &str) -> Result<(), StorageError>;
}

/// A persisted flag together with the options it was written with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedFlag {
    pub value: String,
    pub options: PersistOptions,
}

/// In-memory [`Persistence`].
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    flags: BTreeMap<String, PersistedFlag>,
}

impl MemoryPersistence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Full record for `key`, including options.
    #[must_use]
    pub fn flag(&self, key: &str) -> Option<&PersistedFlag> {
        self.flags.get(key)
    }

    /// Persisted keys in sorted order.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.flags.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

impl Persistence for MemoryPersistence {
    fn get(&self, key: &str) -> Option<String> {
        self.flags.get(key).map(|f| f.value.clone())
    }

    fn set(&mut self, key: &str, value: &str, options: &PersistOptions) -> Result<(), StorageError> {
        self.flags.insert(
            key.to_owned(),
            PersistedFlag { value: value.to_owned(), options: options.clone() },
        );
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        self.flags.remove(key);
        Ok(())
    }
}
