//! objcache - An in-process read-through object cache
//!
//! Named cache groups load missing keys through a getter, keep them in a
//! bounded LRU and dispose of values as they are evicted.

pub mod cache;
pub mod config;
pub mod error;
pub mod group;
pub mod registry;

pub use cache::{CacheStats, Getter, Stats, Value};
pub use config::Config;
pub use error::{CacheError, Result};
pub use group::Group;
pub use registry::GroupRegistry;
