//! Context Store
//!
//! One named mapping from key to [`Entry`], loaded fully into memory for a
//! dispatch cycle and written back in full when mutated.

pub mod persistence;

pub use persistence::{StoreDir, StoreLock};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

type EntryRepr = (String, String);

/// A stored `(timestamp, value)` pair. Serialized as a two-element array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "EntryRepr", into = "EntryRepr")]
pub struct Entry {
    pub timestamp: String,
    pub value: String,
}

impl Entry {
    pub fn new(timestamp: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            value: value.into(),
        }
    }
}

impl From<EntryRepr> for Entry {
    fn from((timestamp, value): EntryRepr) -> Self {
        Entry { timestamp, value }
    }
}

impl From<Entry> for EntryRepr {
    fn from(entry: Entry) -> Self {
        (entry.timestamp, entry.value)
    }
}

/// A named key-value store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextStore {
    name: String,
    entries: BTreeMap<String, Entry>,
}

impl ContextStore {
    /// Empty store; nothing touches disk until it is saved.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_entries(name, BTreeMap::new())
    }

    pub fn with_entries(name: impl Into<String>, entries: BTreeMap<String, Entry>) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or replace, returning the previous entry.
    pub fn insert(&mut self, key: impl Into<String>, entry: Entry) -> Option<Entry> {
        self.entries.insert(key.into(), entry)
    }

    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        self.entries.remove(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Entry)> {
        self.entries.iter()
    }

    pub(crate) fn entries(&self) -> &BTreeMap<String, Entry> {
        &self.entries
    }
}
