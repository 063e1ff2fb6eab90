//! Integration Tests for Cache Groups
//!
//! Drives groups through the public registry API, including concurrent
//! callers on separate threads.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use objcache::{CacheError, Group, GroupRegistry, Value};

// == Helpers ==

/// Value tagged with the getter call that produced it.
#[derive(Debug)]
struct Loaded {
    key: String,
    call: usize,
    disposed: AtomicBool,
}

impl Value for Loaded {
    fn dispose(&self) -> anyhow::Result<()> {
        if self.disposed.swap(true, Ordering::SeqCst) {
            anyhow::bail!("{} disposed twice", self.key);
        }
        Ok(())
    }
}

fn counting_getter(
    calls: Arc<AtomicUsize>,
) -> impl Fn(&str) -> anyhow::Result<Loaded> + Send + Sync + 'static {
    move |key: &str| {
        let call = calls.fetch_add(1, Ordering::SeqCst);
        if key == "x" {
            anyhow::bail!("not found");
        }
        Ok(Loaded {
            key: key.to_string(),
            call,
            disposed: AtomicBool::new(false),
        })
    }
}

// == Get-or-load ==

#[test]
fn test_hit_returns_cached_value_without_loading() {
    let registry = GroupRegistry::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let group = registry.create("hits", 4, counting_getter(calls.clone()));

    let first = group.get("k").unwrap();
    for _ in 0..5 {
        let again = group.get("k").unwrap();
        assert!(Arc::ptr_eq(&first, &again));
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let stats = group.cache_stats();
    assert_eq!(stats.gets, 6);
    assert_eq!(stats.hits, 5);
    assert_eq!(group.stats.cache_hits.get(), 5);
}

#[test]
fn test_capacity_two_evicts_first_of_three() {
    let registry = GroupRegistry::new();
    let group = registry.create("abc", 2, counting_getter(Arc::default()));

    let a = group.get("a").unwrap();
    let b = group.get("b").unwrap();
    let c = group.get("c").unwrap();

    let stats = group.cache_stats();
    assert_eq!(stats.items, 2);
    assert_eq!(stats.evictions, 1);
    assert_eq!(stats.gets, 3);
    assert_eq!(stats.hits, 0);
    assert!(a.disposed.load(Ordering::SeqCst));
    assert!(!b.disposed.load(Ordering::SeqCst));
    assert!(!c.disposed.load(Ordering::SeqCst));
}

#[test]
fn test_capacity_n_plus_one_keys() {
    let registry = GroupRegistry::new();
    let group = registry.create("n_plus_one", 8, counting_getter(Arc::default()));

    for i in 0..9 {
        group.get(&format!("key{i}")).unwrap();
    }

    let stats = group.cache_stats();
    assert_eq!(stats.items, 8);
    assert_eq!(stats.evictions, 1);
    assert_eq!(group.items(), 8);
}

#[test]
fn test_getter_error_propagates_and_caches_nothing() {
    let registry = GroupRegistry::new();
    let group = registry.create("errors", 4, counting_getter(Arc::default()));

    let err = group.get("x").unwrap_err();
    assert!(matches!(err, CacheError::Load(_)));
    assert_eq!(err.to_string(), "not found");

    let stats = group.cache_stats();
    assert_eq!(stats.gets, 1);
    assert_eq!(stats.hits, 0);
    assert_eq!(stats.items, 0);
    assert_eq!(group.stats.gets.get(), 1);
    assert_eq!(group.stats.cache_hits.get(), 0);
}

// == Concurrency ==

#[test]
fn test_concurrent_first_access_loads_at_most_twice() {
    let registry = GroupRegistry::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let group = registry.create("race", 4, counting_getter(calls.clone()));

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let group = group.clone();
            thread::spawn(move || group.get("y").unwrap())
        })
        .collect();
    let returned: Vec<Arc<Loaded>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let loads = calls.load(Ordering::SeqCst);
    assert!((1..=2).contains(&loads), "getter ran {loads} times");

    let cached = group.get("y").unwrap();
    assert_eq!(cached.key, "y");
    assert!(returned.iter().any(|v| Arc::ptr_eq(v, &cached)));
    assert_eq!(group.items(), 1);
}

#[test]
fn test_concurrent_misses_both_load_and_last_write_wins() {
    let registry = GroupRegistry::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(2));
    let getter = {
        let inner = counting_getter(calls.clone());
        let barrier = barrier.clone();
        // Both callers must be inside the getter before either can insert
        move |key: &str| {
            barrier.wait();
            inner(key)
        }
    };
    let group: Arc<Group<Loaded>> = registry.create("both_miss", 4, getter);

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let group = group.clone();
            thread::spawn(move || group.get("y").unwrap())
        })
        .collect();
    let returned: Vec<Arc<Loaded>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_ne!(returned[0].call, returned[1].call);

    // the first insert was displaced by the second and disposed
    let stats = group.cache_stats();
    assert_eq!(stats.items, 1);
    assert_eq!(stats.evictions, 1);
    assert_eq!(stats.dispose_failures, 0);
    let disposed = returned
        .iter()
        .filter(|v| v.disposed.load(Ordering::SeqCst))
        .count();
    assert_eq!(disposed, 1);
}

#[test]
fn test_concurrent_gets_keep_counters_consistent() {
    let registry = GroupRegistry::new();
    let group = registry.create("stress", 16, counting_getter(Arc::default()));

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let group = group.clone();
            thread::spawn(move || {
                for i in 0..500 {
                    let key = format!("key{}", (i * 7 + worker) % 40);
                    group.get(&key).unwrap();
                    let stats = group.cache_stats();
                    assert!(stats.hits <= stats.gets);
                    assert!(stats.items <= 16);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let stats = group.cache_stats();
    assert_eq!(stats.gets, 8 * 500);
    assert_eq!(group.stats.gets.get(), 8 * 500);
    assert_eq!(group.stats.cache_hits.get(), stats.hits);
    // Loaded::dispose fails on a second call, so this catches double disposal
    assert_eq!(stats.dispose_failures, 0);
}

// == Registry ==

#[test]
fn test_distinct_groups_are_retrievable() {
    let registry = GroupRegistry::new();
    let users = registry.create("users", 4, counting_getter(Arc::default()));
    let posts = registry.create("posts", 4, counting_getter(Arc::default()));

    assert!(Arc::ptr_eq(&registry.lookup("users").unwrap(), &users));
    assert!(Arc::ptr_eq(&registry.lookup("posts").unwrap(), &posts));
    assert!(registry.lookup("comments").is_none());
}

#[test]
#[should_panic(expected = "duplicate registration of group users")]
fn test_duplicate_group_is_fatal() {
    let registry = GroupRegistry::new();
    registry.create("users", 4, counting_getter(Arc::default()));
    registry.create("users", 8, counting_getter(Arc::default()));
}

#[test]
fn test_creation_hook_runs_before_create_returns() {
    let registry = GroupRegistry::new();
    let hooked = Arc::new(AtomicUsize::new(0));
    let seen = hooked.clone();
    registry.register_creation_hook(move |group: &Arc<Group<Loaded>>| {
        assert_eq!(group.name(), "hooked");
        seen.fetch_add(1, Ordering::SeqCst);
    });

    let group = registry.create("hooked", 4, counting_getter(Arc::default()));
    assert_eq!(hooked.load(Ordering::SeqCst), 1);
    assert_eq!(group.name(), "hooked");
}

#[test]
#[should_panic(expected = "creation hook registered more than once")]
fn test_second_creation_hook_is_fatal() {
    let registry: GroupRegistry<Loaded> = GroupRegistry::new();
    registry.register_creation_hook(|_| {});
    registry.register_creation_hook(|_| {});
}
