//! Persisted layout configuration.
//!
//! The store holds two JSON documents: `initial`, the baseline the layout was
//! configured with, and `config`, the live copy the UI reads and edits.
//! Property paths are dot separated (`"aside.minimized"`); numeric segments
//! index into arrays (`"menu.items.0"`). Every `set` writes the whole live
//! config to storage under `config_<demo>`, and `override_from` merges that
//! persisted copy back over the baseline on the next start.

#[cfg(test)]
#[path = "layout_config_test.rs"]
mod layout_config_test;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::consts::APP_DEMO;
use crate::error::ConfigError;
use crate::storage::{Storage, save_json};

/// Largest number of `null` slots a single write may pad an array with.
pub const MAX_ARRAY_GAP: usize = 1024;

/// Storage key for the layout config of the compiled-in demo.
#[must_use]
pub fn storage_key() -> String {
    format!("config_{APP_DEMO}")
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfigStore {
    key: String,
    config: Value,
    initial: Value,
}

impl LayoutConfigStore {
    /// Create a store whose baseline and live config are both `defaults`.
    #[must_use]
    pub fn new(defaults: Value) -> Self {
        Self::with_key(defaults, storage_key())
    }

    /// Like [`LayoutConfigStore::new`] with an explicit storage key.
    #[must_use]
    pub fn with_key(defaults: Value, key: impl Into<String>) -> Self {
        Self { key: key.into(), config: defaults.clone(), initial: defaults }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The live configuration.
    #[must_use]
    pub fn config(&self) -> &Value {
        &self.config
    }

    /// The baseline restored by [`LayoutConfigStore::reset`].
    #[must_use]
    pub fn initial(&self) -> &Value {
        &self.initial
    }

    /// Value at `path` in the live config. The empty path yields the whole config.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        if path.is_empty() {
            return Some(&self.config);
        }
        path.split('.').try_fold(&self.config, |node, segment| match node {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => match segment.parse::<usize>() {
                Ok(index) => items.get(index),
                Err(_) => None,
            },
            _ => None,
        })
    }

    /// Value at `path`, or `default` when the path does not resolve.
    ///
    /// A stored `null` resolves; only missing keys fall back.
    #[must_use]
    pub fn get<'a>(&'a self, path: &str, default: &'a Value) -> &'a Value {
        self.lookup(path).unwrap_or(default)
    }

    /// Write `value` at `path`, creating intermediate containers, then persist
    /// the whole live config.
    ///
    /// Missing intermediates become arrays when the next segment is numeric and
    /// objects otherwise. Scalars in the way are replaced. Storage failures are
    /// logged; the in-memory update still applies.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPath`] for an empty path, an empty
    /// segment, a non-numeric segment addressing an existing array, or an
    /// index more than [`MAX_ARRAY_GAP`] past the end of an array. A rejected
    /// write leaves the config untouched.
    pub fn set(&mut self, path: &str, value: Value, storage: &mut dyn Storage) -> Result<(), ConfigError> {
        if path.is_empty() {
            return Err(invalid_path(path, "path is empty"));
        }
        let segments: Vec<&str> = path.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(invalid_path(path, "path has an empty segment"));
        }

        let mut next = self.config.clone();
        assign(&mut next, &segments, value, path)?;
        self.config = next;
        save_json(storage, &self.key, &self.config);
        debug!(path, key = %self.key, "layout config updated");
        Ok(())
    }

    /// Discard live edits by copying the baseline back. Storage is untouched.
    pub fn reset(&mut self) {
        self.config = self.initial.clone();
        debug!(key = %self.key, "layout config reset");
    }

    /// Shallow-merge the persisted config over the baseline.
    ///
    /// The merged object becomes both the new baseline and the live config.
    /// A missing, unreadable, malformed, or non-object persisted value merges
    /// as `{}`.
    pub fn override_from(&mut self, storage: &dyn Storage) {
        let persisted = match read_persisted(storage, &self.key) {
            Ok(map) => map,
            Err(e) => {
                warn!(key = %self.key, error = %e, "ignoring persisted layout config");
                Map::new()
            }
        };

        let overridden = persisted.len();
        let mut merged = self.initial.as_object().cloned().unwrap_or_default();
        merged.extend(persisted);
        self.initial = Value::Object(merged);
        self.config = self.initial.clone();
        debug!(key = %self.key, overridden, "layout config overridden from storage");
    }
}

fn read_persisted(storage: &dyn Storage, key: &str) -> Result<Map<String, Value>, ConfigError> {
    let raw = storage.get_item(key)?.unwrap_or_default();
    if raw.is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<Value>(&raw)? {
        Value::Object(map) => Ok(map),
        _ => Err(ConfigError::NotAnObject),
    }
}

fn assign(slot: &mut Value, segments: &[&str], value: Value, path: &str) -> Result<(), ConfigError> {
    let Some((head, rest)) = segments.split_first() else {
        *slot = value;
        return Ok(());
    };

    match slot {
        Value::Object(map) => {
            let child = map.entry((*head).to_owned()).or_insert(Value::Null);
            assign(child, rest, value, path)
        }
        Value::Array(items) => {
            let index: usize = head
                .parse()
                .map_err(|_| invalid_path(path, "non-numeric segment addresses an array"))?;
            if index >= items.len() {
                if index - items.len() > MAX_ARRAY_GAP {
                    return Err(invalid_path(path, "array index out of range"));
                }
                items.resize(index + 1, Value::Null);
            }
            assign(&mut items[index], rest, value, path)
        }
        other => {
            *other = if head.parse::<usize>().is_ok() {
                Value::Array(Vec::new())
            } else {
                Value::Object(Map::new())
            };
            assign(other, segments, value, path)
        }
    }
}

fn invalid_path(path: &str, reason: &'static str) -> ConfigError {
    ConfigError::InvalidPath { path: path.to_owned(), reason }
}
