//! Layered view over a chain of context stores.
//!
//! Reads fall through the layers in chain order; every write and delete goes
//! to the head (index 0), which is only reachable through this type.

use crate::error::CtxError;
use crate::store::{ContextStore, Entry};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct LayeredView {
    name: String,
    head: ContextStore,
    rest: Vec<ContextStore>,
}

impl LayeredView {
    /// Build a view from the full chain name and its head and lower layers.
    pub fn new(name: impl Into<String>, head: ContextStore, rest: Vec<ContextStore>) -> Self {
        Self {
            name: name.into(),
            head,
            rest,
        }
    }

    /// The chain name as resolved, e.g. `work+main`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn head(&self) -> &ContextStore {
        &self.head
    }

    pub(crate) fn into_head(self) -> ContextStore {
        self.head
    }

    /// All layers, head first.
    pub fn layers(&self) -> impl Iterator<Item = &ContextStore> {
        std::iter::once(&self.head).chain(self.rest.iter())
    }

    pub fn lookup(&self, key: &str) -> Option<&Entry> {
        self.layers().find_map(|layer| layer.get(key))
    }

    pub fn get(&self, key: &str) -> Result<&Entry, CtxError> {
        self.lookup(key)
            .ok_or_else(|| CtxError::KeyNotFound(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Write into the head, shadowing any lower-layer value.
    pub fn set(&mut self, key: &str, value: impl Into<String>, timestamp: impl Into<String>) {
        self.head.insert(key, Entry::new(timestamp, value));
    }

    /// Remove from the head only. Inherited keys cannot be deleted.
    pub fn delete(&mut self, key: &str) -> Result<Entry, CtxError> {
        self.head
            .remove(key)
            .ok_or_else(|| CtxError::KeyNotFound(key.to_string()))
    }

    /// Move `old` to `new` in the head, keeping the original timestamp.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), CtxError> {
        let entry = self.get(old)?.clone();
        if self.contains(new) {
            return Err(CtxError::KeyExists(new.to_string()));
        }
        self.head.insert(new, entry);
        self.head.remove(old);
        Ok(())
    }

    /// Duplicate `old` under `new` with a fresh timestamp.
    pub fn copy(&mut self, old: &str, new: &str, timestamp: impl Into<String>) -> Result<(), CtxError> {
        let value = self.get(old)?.value.clone();
        if self.contains(new) {
            return Err(CtxError::KeyExists(new.to_string()));
        }
        self.head.insert(new, Entry::new(timestamp, value));
        Ok(())
    }

    /// Empty the head store; lower layers are untouched.
    pub fn clear(&mut self) {
        self.head.clear();
    }

    /// Union of all layers, head entries winning, in key order.
    pub fn items(&self) -> Vec<(&str, &Entry)> {
        let mut merged: BTreeMap<&str, &Entry> = BTreeMap::new();
        for layer in self.layers() {
            for (key, entry) in layer.iter() {
                merged.entry(key.as_str()).or_insert(entry);
            }
        }
        merged.into_iter().collect()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.items().into_iter().map(|(k, _)| k).collect()
    }

    /// Union ordered newest first (timestamp, then key, then value, descending).
    pub fn by_recency(&self) -> Vec<(&str, &Entry)> {
        let mut items = self.items();
        items.sort_by(|(ka, a), (kb, b)| {
            (b.timestamp.as_str(), *kb, b.value.as_str()).cmp(&(
                a.timestamp.as_str(),
                *ka,
                a.value.as_str(),
            ))
        });
        items
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers().all(|layer| layer.is_empty())
    }
}
