//! Entry Index Module
//!
//! Ordered key→Entry mapping shared by every built-in store.

use std::collections::HashMap;

use crate::cache::{Entry, InsertionOrder};

// == Entry Index ==
/// Key→Entry storage whose iteration order is insertion order.
///
/// Overwriting a key is a delete followed by an insert, so the overwritten
/// key becomes the newest.
#[derive(Debug, Default, Clone)]
pub struct EntryIndex {
    entries: HashMap<String, Entry>,
    order: InsertionOrder,
}

impl EntryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from entries given oldest first.
    pub fn from_entries(entries: impl IntoIterator<Item = Entry>) -> Self {
        let mut index = Self::new();
        for entry in entries {
            index.insert(entry);
        }
        index
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    // == Insert ==
    /// Inserts an entry as the newest, replacing any entry with the same key.
    ///
    /// Returns the replaced entry.
    pub fn insert(&mut self, entry: Entry) -> Option<Entry> {
        let key = entry.key.clone();
        let previous = self.remove(&key);
        self.order.push(&key);
        self.entries.insert(key, entry);
        previous
    }

    /// Removes the entry for `key`, if any.
    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        let removed = self.entries.remove(key);
        if removed.is_some() {
            self.order.remove(key);
        }
        removed
    }

    /// Key of the oldest surviving insertion.
    pub fn oldest_key(&self) -> Option<&String> {
        self.order.oldest()
    }

    /// All keys, oldest insertion first.
    pub fn keys(&self) -> Vec<String> {
        self.order.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
