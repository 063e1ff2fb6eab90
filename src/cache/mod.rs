//! Cache Module
//!
//! Value capabilities, the bounded LRU and the synchronized store each group
//! keeps its entries in.

mod bounded;
mod lock;
mod stats;
mod store;
mod value;


// Re-export public types
pub use bounded::{BoundedCache, LruCache, OnEvicted};
pub use stats::{AtomicInt, CacheStats, Stats, StatsSnapshot};
pub use store::CacheStore;
pub use value::{Getter, Value};

pub(crate) use lock::{rw_read, rw_write};
