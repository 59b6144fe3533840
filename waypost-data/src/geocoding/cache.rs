//! Process-lifetime address cache.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use waypost_core::Coordinates;

/// Thread-safe map from normalised query to resolved coordinates.
///
/// Entries are never evicted; [`GeocodeCache::clear`] is the only way to
/// drop them.
#[derive(Debug, Default)]
pub struct GeocodeCache {
    entries: RwLock<HashMap<String, Coordinates>>,
}

impl GeocodeCache {
    /// Cached coordinates for `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Coordinates> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .copied()
    }

    /// Store `coordinates` under `key`, replacing any previous entry.
    pub fn insert(&self, key: impl Into<String>, coordinates: Coordinates) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), coordinates);
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of cached keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
