use std::collections::HashMap;
use std::sync::{Arc, Mutex as MapMutex, MutexGuard};
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockMap = HashMap<String, Arc<Mutex<()>>>;

/// Per-transaction locks for the confirmation flow.
///
/// Two confirmations for the same transaction reference run one after the
/// other; different references never wait on each other. Entries are dropped
/// once no caller holds or waits on them.
///
/// The map itself sits behind a std mutex that is never held across an
/// await, so a guard can always take it on drop.
#[derive(Default, Clone)]
pub struct TransactionLocks {
    locks: Arc<MapMutex<LockMap>>,
}

/// Held for the duration of one confirmation.
pub struct TransactionGuard {
    key: String,
    locks: Arc<MapMutex<LockMap>>,
    guard: Option<OwnedMutexGuard<()>>,
}

fn lock_map(locks: &MapMutex<LockMap>) -> MutexGuard<'_, LockMap> {
    // The map stays consistent even if a holder panicked.
    locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl TransactionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, transaction_id: &str) -> TransactionGuard {
        let entry = lock_map(&self.locks)
            .entry(transaction_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = entry.lock_owned().await;
        TransactionGuard {
            key: transaction_id.to_string(),
            locks: self.locks.clone(),
            guard: Some(guard),
        }
    }

    /// Number of references currently tracked.
    pub fn len(&self) -> usize {
        lock_map(&self.locks).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for TransactionGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut locks = lock_map(&self.locks);
        if locks
            .get(&self.key)
            .is_some_and(|entry| Arc::strong_count(entry) == 1)
        {
            locks.remove(&self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_key_is_serialized() {
        let locks = TransactionLocks::new();
        let inside = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let locks = locks.clone();
            let inside = inside.clone();
            let max_seen = max_seen.clone();
            handles.push(tokio::spawn(async move {
                let _guard = locks.acquire("pi_1").await;
                let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                inside.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_different_keys_do_not_block() {
        let locks = TransactionLocks::new();
        let _a = locks.acquire("pi_a").await;
        let b = tokio::time::timeout(Duration::from_millis(100), locks.acquire("pi_b")).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn test_entries_are_released() {
        let locks = TransactionLocks::new();
        {
            let _guard = locks.acquire("pi_1").await;
            assert_eq!(locks.len(), 1);
        }
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_entry_released_while_map_is_busy() {
        let locks = TransactionLocks::new();
        let guard = locks.acquire("pi_unique_1").await;

        let (held_tx, held_rx) = std::sync::mpsc::channel();
        let map = locks.locks.clone();
        let holder = std::thread::spawn(move || {
            let _map = lock_map(&map);
            held_tx.send(()).unwrap();
            std::thread::sleep(Duration::from_millis(50));
        });

        held_rx.recv().unwrap();
        // blocks until the holder lets go of the map, then cleans up
        drop(guard);
        holder.join().unwrap();

        assert!(locks.is_empty());
    }
}
