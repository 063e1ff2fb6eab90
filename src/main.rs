//! objcache demo
//!
//! Drives a single cache group from several threads over a skewed key space
//! and prints the resulting statistics as JSON.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::thread;

use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use objcache::{Config, Group, GroupRegistry, Value};

/// Bytes currently held by resident (not yet disposed) buffers.
static LIVE_BYTES: AtomicI64 = AtomicI64::new(0);

/// A rendered buffer standing in for an expensive remote object.
struct Rendered {
    bytes: Vec<u8>,
}

impl Rendered {
    fn render(key: &str) -> anyhow::Result<Self> {
        let seed: u64 = key
            .strip_prefix("object-")
            .ok_or_else(|| anyhow::anyhow!("unknown object key: {key}"))?
            .parse()?;
        let bytes: Vec<u8> = (0..256u64).map(|i| ((seed * 31 + i) % 251) as u8).collect();
        LIVE_BYTES.fetch_add(bytes.len() as i64, Ordering::Relaxed);
        Ok(Self { bytes })
    }
}

impl Value for Rendered {
    fn dispose(&self) -> anyhow::Result<()> {
        LIVE_BYTES.fetch_sub(self.bytes.len() as i64, Ordering::Relaxed);
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "objcache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_capacity={}, demo_keys={}, demo_workers={}",
        config.cache_capacity, config.demo_keys, config.demo_workers
    );

    let registry = GroupRegistry::new();
    registry.try_register_creation_hook(|group: &Arc<Group<Rendered>>| {
        debug!(group = group.name(), "Creation hook observed new group");
    })?;
    let group = registry.try_create("rendered", config.cache_capacity, Rendered::render)?;

    let key_space = config.demo_keys.max(1);
    let handles: Vec<_> = (0..config.demo_workers)
        .map(|worker| {
            let group = group.clone();
            thread::spawn(move || -> objcache::Result<()> {
                for i in 0..key_space {
                    // Squaring skews lookups towards low ids so some keys repeat
                    let id = i.wrapping_mul(i).wrapping_add(worker) % key_space;
                    group.get(&format!("object-{id}"))?;
                }
                Ok(())
            })
        })
        .collect();

    for handle in handles {
        handle
            .join()
            .map_err(|_| anyhow::anyhow!("demo worker panicked"))??;
    }

    let report = json!({
        "group": group.name(),
        "cache": group.cache_stats(),
        "hit_rate": group.cache_stats().hit_rate(),
        "stats": group.stats.snapshot(),
        "live_bytes": LIVE_BYTES.load(Ordering::Relaxed),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    info!("Demo complete");
    Ok(())
}
