//! Per-key asynchronous mutual exclusion

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

struct Slot {
    mutex: Arc<AsyncMutex<()>>,
    /// Holders plus callers still waiting
    users: usize,
}

/// A table of async mutexes, one per key
///
/// Holders of different keys never wait on each other. A key's entry is
/// created on first use and dropped once its last holder or waiter is gone,
/// including waiters whose `lock` future is cancelled.
pub struct KeyedMutex<K: Eq + Hash> {
    slots: Mutex<HashMap<K, Slot>>,
}

impl<K: Eq + Hash + Clone> KeyedMutex<K> {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Wait until `key` is free and take it
    pub async fn lock(&self, key: K) -> KeyGuard<'_, K> {
        let mutex = {
            let mut slots = self.table();
            let slot = slots.entry(key.clone()).or_insert_with(|| Slot {
                mutex: Arc::new(AsyncMutex::new(())),
                users: 0,
            });
            slot.users += 1;
            slot.mutex.clone()
        };

        // Registered before the await so a cancelled waiter still deregisters
        let lease = Lease { owner: self, key };
        let guard = mutex.lock_owned().await;

        KeyGuard {
            _guard: guard,
            _lease: lease,
        }
    }

    /// Number of keys currently held or awaited
    pub fn active_keys(&self) -> usize {
        self.table().len()
    }
}

impl<K: Eq + Hash> KeyedMutex<K> {
    // The table is never left half-updated, so a poisoned lock is still usable
    fn table(&self) -> MutexGuard<'_, HashMap<K, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K: Eq + Hash + Clone> Default for KeyedMutex<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// One caller's registration on a key
struct Lease<'a, K: Eq + Hash> {
    owner: &'a KeyedMutex<K>,
    key: K,
}

impl<'a, K: Eq + Hash> Drop for Lease<'a, K> {
    fn drop(&mut self) {
        let mut slots = self.owner.table();
        if let Some(slot) = slots.get_mut(&self.key) {
            slot.users -= 1;
            if slot.users == 0 {
                slots.remove(&self.key);
            }
        }
    }
}

/// Exclusive hold on one key; released on drop
pub struct KeyGuard<'a, K: Eq + Hash> {
    // Field order matters: the mutex is released before the lease
    _guard: OwnedMutexGuard<()>,
    _lease: Lease<'a, K>,
}
