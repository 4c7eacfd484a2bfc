//! Poison-tolerant `RwLock` access.
//!
//! A panic while a guard is held poisons the lock. The shared tables guarded
//! here stay usable afterwards, so the guard is recovered and a warning is
//! logged naming the owner and the operation.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub fn rw_read<'a, T>(
    lock: &'a RwLock<T>,
    target: &'static str,
    op: &'static str,
) -> RwLockReadGuard<'a, T> {
    match lock.read() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::warn!(
                op,
                target_module = target,
                lock_kind = "rwlock.read",
                "Recovered from poisoned lock"
            );
            poisoned.into_inner()
        }
    }
}

pub fn rw_write<'a, T>(
    lock: &'a RwLock<T>,
    target: &'static str,
    op: &'static str,
) -> RwLockWriteGuard<'a, T> {
    match lock.write() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::warn!(
                op,
                target_module = target,
                lock_kind = "rwlock.write",
                "Recovered from poisoned lock"
            );
            poisoned.into_inner()
        }
    }
}
