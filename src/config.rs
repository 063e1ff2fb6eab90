//! Configuration Module
//!
//! Handles loading the demo workload configuration from environment variables.

use std::env;

/// Demo configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries each group's cache can hold (0 = unbounded)
    pub cache_capacity: usize,
    /// Number of distinct keys the demo workload draws from
    pub demo_keys: usize,
    /// Number of worker threads issuing lookups
    pub demo_workers: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum entries per group (default: 1000)
    /// - `DEMO_KEYS` - Size of the demo key space (default: 5000)
    /// - `DEMO_WORKERS` - Worker thread count (default: 4)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_capacity: parse_var("CACHE_CAPACITY").unwrap_or(defaults.cache_capacity),
            demo_keys: parse_var("DEMO_KEYS").unwrap_or(defaults.demo_keys),
            demo_workers: parse_var("DEMO_WORKERS")
                .filter(|&n| n > 0)
                .unwrap_or(defaults.demo_workers),
        }
    }
}

fn parse_var(name: &str) -> Option<usize> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: 1000,
            demo_keys: 5000,
            demo_workers: 4,
        }
    }
}
