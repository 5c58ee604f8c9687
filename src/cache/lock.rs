//! Lock access for the in-process store maps.
//!
//! A panic while a store map is held leaves the lock poisoned. The map itself
//! is still a complete map (entries are inserted whole), so the guard is
//! taken over and the event is logged instead of propagating the panic.

use std::sync::{LockResult, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

pub(crate) fn rw_read<'a, T>(
    lock: &'a RwLock<T>,
    store: &'static str,
    op: &'static str,
) -> RwLockReadGuard<'a, T> {
    recover(lock.read(), store, op)
}

pub(crate) fn rw_write<'a, T>(
    lock: &'a RwLock<T>,
    store: &'static str,
    op: &'static str,
) -> RwLockWriteGuard<'a, T> {
    recover(lock.write(), store, op)
}

fn recover<G>(result: LockResult<G>, store: &'static str, op: &'static str) -> G {
    result.unwrap_or_else(|poisoned| {
        warn!(
            target = "insightarc::cache::store",
            store,
            op,
            "Store map lock poisoned; reusing entries"
        );
        poisoned.into_inner()
    })
}
