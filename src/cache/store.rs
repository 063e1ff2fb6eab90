//! Cache Store Module
//!
//! Synchronized wrapper around the bounded LRU that keeps hit, get and
//! eviction accounting consistent with the cache contents.

use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use crate::cache::lock::{rw_read, rw_write};
use crate::cache::{BoundedCache, CacheStats, LruCache, OnEvicted, Value};

const SOURCE: &str = "cache::store";

// == Eviction Recorder ==
/// Eviction hook installed on every store: disposes the value and counts it.
///
/// Lives inside the locked state, so its counters are read under the same
/// lock as the hit and get counters.
struct DisposeOnEvict {
    group: String,
    evictions: i64,
    dispose_failures: i64,
}

impl<V: Value> OnEvicted<Arc<V>> for DisposeOnEvict {
    fn on_evicted(&mut self, key: &str, value: Arc<V>) {
        self.evictions += 1;
        match value.dispose() {
            Ok(()) => debug!(group = %self.group, key, "Evicted cache entry"),
            Err(err) => {
                self.dispose_failures += 1;
                warn!(
                    group = %self.group,
                    key,
                    error = %err,
                    "Failed to dispose evicted value"
                );
            }
        }
    }
}

struct CacheState<V> {
    lru: LruCache<Arc<V>, DisposeOnEvict>,
    nget: i64,
    nhit: i64,
}

impl<V: Value> CacheState<V> {
    fn stats(&self) -> CacheStats {
        let hook = self.lru.hook();
        CacheStats {
            items: self.lru.len() as i64,
            gets: self.nget,
            hits: self.nhit,
            evictions: hook.evictions,
            dispose_failures: hook.dispose_failures,
        }
    }
}

// == Cache Store ==
/// Thread-safe bounded cache with lock-consistent statistics.
pub struct CacheStore<V> {
    state: RwLock<CacheState<V>>,
}

impl<V: Value> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store for `group` holding at most `max_entries`
    /// values (0 = unbounded).
    pub fn new(group: &str, max_entries: usize) -> Self {
        let hook = DisposeOnEvict {
            group: group.to_string(),
            evictions: 0,
            dispose_failures: 0,
        };

        let lru = LruCache::new(max_entries, hook);
        debug!(group, max_entries = lru.max_entries(), "Initialized cache store");

        Self {
            state: RwLock::new(CacheState {
                lru,
                nget: 0,
                nhit: 0,
            }),
        }
    }

    // == Add ==
    /// Inserts or replaces `key`.
    ///
    /// Any value displaced by this insert is disposed before the lock is
    /// released. Re-adding the value already resident under `key` only
    /// refreshes its recency.
    pub fn add(&self, key: &str, value: Arc<V>) {
        let mut state = rw_write(&self.state, SOURCE, "add");
        let resident = state
            .lru
            .peek(key)
            .is_some_and(|current| Arc::ptr_eq(current, &value));
        if resident {
            state.lru.get(key);
            return;
        }
        state.lru.add(key.to_string(), value);
    }

    // == Get ==
    /// Looks up `key`, counting the lookup and, if found, the hit.
    ///
    /// Takes the write lock: the counters and LRU order both change.
    pub fn get(&self, key: &str) -> Option<Arc<V>> {
        let mut state = rw_write(&self.state, SOURCE, "get");
        state.nget += 1;
        let value = state.lru.get(key).cloned();
        if value.is_some() {
            state.nhit += 1;
        }
        value
    }

    // == Stats ==
    /// Returns a consistent snapshot of the store's counters.
    pub fn stats(&self) -> CacheStats {
        rw_read(&self.state, SOURCE, "stats").stats()
    }

    // == Items ==
    /// Returns the number of resident entries.
    pub fn items(&self) -> i64 {
        rw_read(&self.state, SOURCE, "items").lru.len() as i64
    }
}
