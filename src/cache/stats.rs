//! Cache Statistics Module
//!
//! Lock-free per-group counters and the snapshot types handed to callers.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use serde::Serialize;

// == Atomic Int ==
/// An i64 counter safe to update from many threads without a lock.
#[derive(Debug, Default)]
pub struct AtomicInt(AtomicI64);

impl AtomicInt {
    /// Atomically adds `n`.
    pub fn add(&self, n: i64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    /// Atomically reads the current value.
    pub fn get(&self) -> i64 {
        self.0.load(Ordering::Relaxed)
    }
}

impl fmt::Display for AtomicInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

// == Group Stats ==
/// Per-group request counters, updated on every `Group::get`.
///
/// These are independent of the lock-protected [`CacheStats`] counters;
/// the two sets are each consistent on their own but are not read together.
#[derive(Debug, Default)]
pub struct Stats {
    /// Any get request
    pub gets: AtomicInt,
    /// Requests served from the cache
    pub cache_hits: AtomicInt,
}

impl Stats {
    /// Reads both counters into a plain snapshot.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            gets: self.gets.get(),
            cache_hits: self.cache_hits.get(),
        }
    }
}

/// Point-in-time copy of a group's [`Stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub gets: i64,
    pub cache_hits: i64,
}

// == Cache Stats ==
/// Consistent snapshot of a group's cache, taken under its lock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Entries currently resident
    pub items: i64,
    /// Cache lookups, hit or miss
    pub gets: i64,
    /// Lookups that found an entry
    pub hits: i64,
    /// Entries removed by the eviction policy, overwrites included
    pub evictions: i64,
    /// Evicted values whose dispose call failed
    pub dispose_failures: i64,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / gets, or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        if self.gets == 0 {
            0.0
        } else {
            self.hits as f64 / self.gets as f64
        }
    }
}
