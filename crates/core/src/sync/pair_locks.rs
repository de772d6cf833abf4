//! Per-pair mutual exclusion
//!
//! Propagation reads the linked leg and then writes it, so two sync
//! operations touching either leg of the same pair must never interleave.
//! Each [`PairKey`] maps to one async mutex; holders keep an owned guard for
//! the whole read-modify-write.

use std::sync::Arc;

use dashmap::DashMap;
use fids_domain::PairKey;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::trace;

/// Registry of async mutexes keyed by pair.
#[derive(Debug, Default, Clone)]
pub struct PairLocks {
    locks: Arc<DashMap<PairKey, Arc<Mutex<()>>>>,
}

impl PairLocks {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`.
    pub async fn acquire(&self, key: PairKey) -> OwnedMutexGuard<()> {
        // Clone the mutex out so the map shard is not held across the await.
        let lock = Arc::clone(&*self.locks.entry(key).or_default());
        if lock.try_lock().is_err() {
            trace!(pair = %key, "pair_lock.contended");
        }
        lock.lock_owned().await
    }

    /// Drop entries nobody holds or waits on. Returns how many were removed.
    pub fn prune(&self) -> usize {
        let before = self.locks.len();
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        before.saturating_sub(self.locks.len())
    }

    /// Number of pair entries currently held in the registry
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// True when no pair entry is registered
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use uuid::Uuid;

    use super::*;

    #[tokio::test]
    async fn both_legs_share_one_lock() {
        let locks = PairLocks::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        let _guard = locks.acquire(PairKey::new(a, Some(b))).await;
        let other_leg = locks.acquire(PairKey::new(b, Some(a)));
        let waited = tokio::time::timeout(Duration::from_millis(50), other_leg).await;
        assert!(waited.is_err(), "second leg acquired the pair lock concurrently");
        assert_eq!(locks.len(), 1);
    }

    #[tokio::test]
    async fn distinct_pairs_do_not_block() {
        let locks = PairLocks::new();
        let _first = locks.acquire(PairKey::new(Uuid::new_v4(), None)).await;
        let second = tokio::time::timeout(
            Duration::from_millis(50),
            locks.acquire(PairKey::new(Uuid::new_v4(), None)),
        )
        .await;
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn prune_keeps_held_locks() {
        let locks = PairLocks::new();
        let held = PairKey::new(Uuid::new_v4(), None);
        let released = PairKey::new(Uuid::new_v4(), None);

        let _guard = locks.acquire(held).await;
        drop(locks.acquire(released).await);

        assert_eq!(locks.prune(), 1);
        assert_eq!(locks.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn critical_sections_never_overlap() {
        let locks = PairLocks::new();
        let key = PairKey::new(Uuid::new_v4(), Some(Uuid::new_v4()));
        let inside = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..32 {
            let locks = locks.clone();
            let inside = Arc::clone(&inside);
            let max_seen = Arc::clone(&max_seen);
            handles.push(tokio::spawn(async move {
                let _guard = locks.acquire(key).await;
                let now_inside = inside.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now_inside, Ordering::SeqCst);
                tokio::task::yield_now().await;
                inside.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }
}
