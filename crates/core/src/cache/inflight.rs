//! Per-key in-flight locks for cache misses.
//!
//! The first caller to miss on a key computes the value while holding the
//! key's lock; concurrent callers for the same key wait on it and then find
//! the freshly stored entry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

type KeyLock = Arc<tokio::sync::Mutex<()>>;

#[derive(Debug, Default)]
pub(crate) struct InflightLocks {
    locks: Mutex<HashMap<String, KeyLock>>,
}

impl InflightLocks {
    /// Shared lock handle for `key`, created on first use.
    pub(crate) fn handle(&self, key: &str) -> KeyLock {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(key.to_string()).or_default().clone()
    }

    /// Drop the map entry once no other caller holds the handle.
    pub(crate) fn release(&self, key: &str, handle: &KeyLock) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(current) = locks.get(key)
            && Arc::ptr_eq(current, handle)
            && Arc::strong_count(handle) <= 2
        {
            locks.remove(key);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_key_shares_handle() {
        let locks = InflightLocks::default();
        let a = locks.handle("k");
        let b = locks.handle("k");
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &locks.handle("other")));
    }

    #[test]
    fn test_release_keeps_entry_while_shared() {
        let locks = InflightLocks::default();
        let a = locks.handle("k");
        let b = locks.handle("k");

        locks.release("k", &a);
        assert_eq!(locks.len(), 1);

        drop(a);
        locks.release("k", &b);
        assert_eq!(locks.len(), 0);
    }
}
