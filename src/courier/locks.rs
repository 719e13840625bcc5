//! Per-order write locks
//!
//! Every read-modify-write of a stored order goes through the order's lock:
//! courier dispatch, status sync and status changes. Locks for different
//! orders are independent.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

#[derive(Default)]
pub struct OrderLocks {
    held: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl OrderLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive write access to `order_id`
    pub async fn acquire(&self, order_id: &Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut held = self.held.lock().await;
            // Only the map references an idle lock
            held.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(
                held.entry(*order_id)
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.held.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_order_is_exclusive() {
        let locks = Arc::new(OrderLocks::new());
        let id = Uuid::new_v4();

        let guard = locks.acquire(&id).await;
        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(&id).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn test_other_orders_do_not_wait() {
        let locks = OrderLocks::new();
        let _a = locks.acquire(&Uuid::new_v4()).await;
        let b = tokio::time::timeout(Duration::from_millis(50), locks.acquire(&Uuid::new_v4())).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn test_idle_locks_are_dropped() {
        let locks = OrderLocks::new();
        for _ in 0..5 {
            let _guard = locks.acquire(&Uuid::new_v4()).await;
        }
        let _guard = locks.acquire(&Uuid::new_v4()).await;
        assert_eq!(locks.len().await, 1);
    }
}
