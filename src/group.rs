//! Group Module
//!
//! A group is a named cache namespace: one getter, one bounded store, and
//! the get-or-load protocol tying them together.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::cache::{CacheStats, CacheStore, Getter, Stats, Value};
use crate::error::Result;

// == Group ==
/// A cache namespace that loads missing keys through its getter.
///
/// Concurrent misses on the same key are not coalesced: each caller runs
/// the getter and inserts its own result, and the last insert wins. The
/// displaced value is disposed like any other eviction.
pub struct Group<V> {
    name: String,
    getter: Box<dyn Getter<V>>,
    main_cache: CacheStore<V>,
    /// Statistics on the group
    pub stats: Stats,
}

impl<V: Value> Group<V> {
    pub(crate) fn new(name: &str, max_entries: usize, getter: Box<dyn Getter<V>>) -> Self {
        Self {
            name: name.to_string(),
            getter,
            main_cache: CacheStore::new(name, max_entries),
            stats: Stats::default(),
        }
    }

    /// Returns the name of the group.
    pub fn name(&self) -> &str {
        &self.name
    }

    // == Get ==
    /// Returns the value for `key`, loading and caching it on a miss.
    ///
    /// A getter error is returned unchanged as [`CacheError::Load`] and
    /// nothing is cached for the key.
    ///
    /// [`CacheError::Load`]: crate::error::CacheError::Load
    pub fn get(&self, key: &str) -> Result<Arc<V>> {
        self.stats.gets.add(1);
        if let Some(value) = self.main_cache.get(key) {
            self.stats.cache_hits.add(1);
            return Ok(value);
        }

        let value = match self.getter.get(key) {
            Ok(value) => Arc::new(value),
            Err(err) => {
                debug!(group = %self.name, key, error = %err, "Getter failed");
                return Err(err.into());
            }
        };
        self.main_cache.add(key, value.clone());
        Ok(value)
    }

    /// Returns a consistent snapshot of this group's cache.
    pub fn cache_stats(&self) -> CacheStats {
        self.main_cache.stats()
    }

    /// Returns the number of entries currently cached.
    pub fn items(&self) -> i64 {
        self.main_cache.items()
    }
}

impl<V> fmt::Debug for Group<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
