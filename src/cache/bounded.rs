//! Bounded LRU Cache Module
//!
//! Fixed-capacity key/value store with least-recently-used eviction and a
//! synchronous eviction hook, built on the `lru` crate.

use std::num::NonZeroUsize;

// == Eviction Hook ==
/// Receives every entry the bounded cache removes by policy.
///
/// The hook runs synchronously on the thread calling [`BoundedCache::add`],
/// inside whatever lock guards the cache. It must only do bookkeeping on its
/// own state; touching the cache or its lock from here deadlocks.
pub trait OnEvicted<V>: Send {
    fn on_evicted(&mut self, key: &str, value: V);
}

impl<V, F> OnEvicted<V> for F
where
    F: FnMut(&str, V) + Send,
{
    fn on_evicted(&mut self, key: &str, value: V) {
        self(key, value)
    }
}

// == Bounded Cache ==
/// Capability the cache wrapper needs from its backing store.
pub trait BoundedCache<V> {
    /// Inserts or replaces `key`.
    ///
    /// A replaced value, or the entry pushed out by capacity pressure, is
    /// handed to the eviction hook before this returns.
    fn add(&mut self, key: String, value: V);

    /// Looks up `key`, marking it as recently used.
    fn get(&mut self, key: &str) -> Option<&V>;

    /// Looks up `key` without touching its recency.
    fn peek(&self, key: &str) -> Option<&V>;

    /// Number of resident entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// == LRU Cache ==
/// LRU-ordered bounded cache.
///
/// A `max_entries` of zero means no limit: entries only leave through
/// overwrites.
pub struct LruCache<V, H> {
    /// Entries in recency order
    entries: lru::LruCache<String, V>,
    /// Maximum number of entries, 0 = unbounded
    max_entries: usize,
    /// Called for every evicted entry
    hook: H,
}

impl<V, H: OnEvicted<V>> LruCache<V, H> {
    // == Constructor ==
    /// Creates an empty cache holding at most `max_entries` values.
    pub fn new(max_entries: usize, hook: H) -> Self {
        let entries = match NonZeroUsize::new(max_entries) {
            Some(cap) => lru::LruCache::new(cap),
            None => lru::LruCache::unbounded(),
        };

        Self {
            entries,
            max_entries,
            hook,
        }
    }

    /// Returns the configured capacity (0 = unbounded).
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Returns the installed eviction hook.
    pub fn hook(&self) -> &H {
        &self.hook
    }
}

impl<V, H: OnEvicted<V>> BoundedCache<V> for LruCache<V, H> {
    fn add(&mut self, key: String, value: V) {
        // push hands back either the displaced value for this key or the
        // least recently used entry when at capacity
        if let Some((evicted_key, evicted)) = self.entries.push(key, value) {
            self.hook.on_evicted(&evicted_key, evicted);
        }
    }

    fn get(&mut self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    fn peek(&self, key: &str) -> Option<&V> {
        self.entries.peek(key)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
