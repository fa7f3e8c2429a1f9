//! Per-collection write serialization.

use mea::{mutex::Mutex, rwlock::RwLock};
use std::{collections::HashMap, fmt, sync::Arc};

/// One async mutex per collection name.
///
/// Holding a collection's lock across load, mutate and save makes that cycle atomic with
/// respect to every other writer of the same collection. Different collections never block
/// each other.
#[derive(Default)]
pub struct WriteLocks {
    locks: RwLock<HashMap<String, Arc<Mutex<()>>>>,
}

impl fmt::Debug for WriteLocks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteLocks").finish_non_exhaustive()
    }
}

impl WriteLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lock guarding `collection`, creating it on first use.
    pub async fn for_collection(&self, collection: &str) -> Arc<Mutex<()>> {
        if let Some(lock) = self.locks.read().await.get(collection) {
            return lock.clone();
        }

        self.locks
            .write()
            .await
            .entry(collection.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_collection_shares_one_lock() {
        let locks = WriteLocks::new();

        let a = locks.for_collection("users").await;
        let b = locks.for_collection("users").await;
        let c = locks.for_collection("posts").await;

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }
}
