//! Per-owner mutual exclusion.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Hands out one lock per owner id. Entries live as long as the table, so
/// it grows with the number of distinct owners seen by this process.
#[derive(Debug, Default)]
pub struct OwnerLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl OwnerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `critical` while holding `owner`'s lock. Different owners never
    /// block each other.
    pub fn with_owner<T>(&self, owner: &str, critical: impl FnOnce() -> T) -> T {
        let lock = {
            let mut table = self.locks.lock();
            Arc::clone(table.entry(owner.to_string()).or_default())
        };
        let _guard = lock.lock();
        critical()
    }

    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
