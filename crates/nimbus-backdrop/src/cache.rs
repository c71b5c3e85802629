//! In-memory cache of resolved background URLs.
//!
//! Keys come from a small fixed set of weather categories, so entries are
//! never evicted; `clear` is the only way to drop them.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Shared weather-key -> URL store.
///
/// Cloning yields another handle to the same entries.
#[derive(Debug, Clone, Default)]
pub struct BackdropCache {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl BackdropCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached URL for `key`, if any.
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    /// Store `url` for `key`, replacing any earlier value.
    pub fn insert(&self, key: &str, url: &str) {
        self.entries.write().insert(key.to_string(), url.to_string());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
