use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

// Getters run outside these locks; only a panicking dispose or creation hook
// can poison one. The guarded state is still usable, so take it back.

pub(crate) fn rw_read<'a, T>(
    lock: &'a RwLock<T>,
    owner: &'static str,
    op: &'static str,
) -> RwLockReadGuard<'a, T> {
    lock.read().unwrap_or_else(|poisoned| {
        warn!(owner, op, mode = "read", "Lock poisoned, reusing guarded state");
        poisoned.into_inner()
    })
}

pub(crate) fn rw_write<'a, T>(
    lock: &'a RwLock<T>,
    owner: &'static str,
    op: &'static str,
) -> RwLockWriteGuard<'a, T> {
    lock.write().unwrap_or_else(|poisoned| {
        warn!(owner, op, mode = "write", "Lock poisoned, reusing guarded state");
        poisoned.into_inner()
    })
}
