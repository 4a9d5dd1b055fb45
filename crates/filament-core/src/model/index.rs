/// The in-memory filament index.
///
/// Maps `slicer/subdirectory/filename` keys to loaded profiles. Backed by a
/// `BTreeMap` so every snapshot and summary iterates in key order, which
/// keeps repeated scans of an unchanged tree byte-for-byte identical.
use super::profile::ProfileEntry;
use parking_lot::RwLock;
use std::collections::btree_map::{self, BTreeMap};
use std::sync::Arc;

/// A shared, concurrently-readable index.
///
/// The scanner holds a write lock briefly when inserting a batch of
/// profiles. Query callers take read locks and may observe a partially
/// populated index while a scan is running.
pub type SharedIndex = Arc<RwLock<FilamentIndex>>;

/// Session-lifetime store of every profile loaded so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilamentIndex {
    entries: BTreeMap<String, ProfileEntry>,
}

impl FilamentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a fresh empty index for sharing with a scan thread.
    pub fn shared() -> SharedIndex {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Insert an entry, replacing (not merging) any entry with the same key.
    ///
    /// Returns the replaced entry, if there was one.
    pub fn insert(&mut self, entry: ProfileEntry) -> Option<ProfileEntry> {
        self.entries.insert(entry.key.clone(), entry)
    }

    pub fn get(&self, key: &str) -> Option<&ProfileEntry> {
        self.entries.get(key)
    }

    /// Owned copy of the whole mapping.
    pub fn get_all(&self) -> BTreeMap<String, ProfileEntry> {
        self.entries.clone()
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// All keys, in key order.
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> btree_map::Values<'_, String, ProfileEntry> {
        self.entries.values()
    }
}
