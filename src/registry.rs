//! Keyed instance registry: associates component instances with elements.
//!
//! One registry is owned by the page-level host. Entries are addressed by
//! `(element, key)`, where the key names the component kind (`"toggle"`), so
//! several component kinds can attach to the same element. Insertion is
//! insert-if-absent, which is what makes repeated bootstrapping idempotent.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use std::collections::HashMap;

use crate::dom::ElementId;

/// Map from `(element, key)` to an owned instance.
#[derive(Debug)]
pub struct InstanceRegistry<T> {
    entries: HashMap<ElementId, HashMap<&'static str, T>>,
}

impl<T> Default for InstanceRegistry<T> {
    fn default() -> Self {
        Self { entries: HashMap::new() }
    }
}

impl<T> InstanceRegistry<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Instance stored under `key` for `element`.
    #[must_use]
    pub fn get(&self, element: ElementId, key: &str) -> Option<&T> {
        self.entries.get(&element).and_then(|m| m.get(key))
    }

    /// Mutable instance stored under `key` for `element`.
    pub fn get_mut(&mut self, element: ElementId, key: &str) -> Option<&mut T> {
        self.entries.get_mut(&element).and_then(|m| m.get_mut(key))
    }

    #[must_use]
    pub fn contains(&self, element: ElementId, key: &str) -> bool {
        self.get(element, key).is_some()
    }

    /// Store the instance built by `make` unless one already exists.
    ///
    /// `make` only runs when the slot is empty. Returns `true` when a new
    /// instance was inserted.
    pub fn insert_if_absent<F>(&mut self, element: ElementId, key: &'static str, make: F) -> bool
    where
        F: FnOnce() -> T,
    {
        let slot = self.entries.entry(element).or_default();
        if slot.contains_key(key) {
            return false;
        }
        slot.insert(key, make());
        true
    }

    /// Remove and return the instance under `key` for `element`.
    pub fn remove(&mut self, element: ElementId, key: &str) -> Option<T> {
        let slot = self.entries.get_mut(&element)?;
        let removed = slot.remove(key);
        if slot.is_empty() {
            self.entries.remove(&element);
        }
        removed
    }

    /// Number of instances stored under `key` across all elements.
    #[must_use]
    pub fn count(&self, key: &str) -> usize {
        self.entries.values().filter(|m| m.contains_key(key)).count()
    }

    /// Total number of instances across all keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Elements holding an instance under `key`, sorted by handle.
    #[must_use]
    pub fn elements(&self, key: &str) -> Vec<ElementId> {
        let mut out: Vec<ElementId> = self
            .entries
            .iter()
            .filter(|(_, m)| m.contains_key(key))
            .map(|(el, _)| *el)
            .collect();
        out.sort_unstable();
        out
    }
}
