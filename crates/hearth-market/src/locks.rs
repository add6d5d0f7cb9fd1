//! Per-property write serialization.
//!
//! Only writers inside this process are covered. Several server
//! processes sharing one database need a store-side guard instead.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use hearth_core::deadline::within;
use hearth_core::error::HearthResult;
use tokio::sync::OwnedMutexGuard;
use tracing::debug;
use uuid::Uuid;

/// Entries beyond this count trigger a sweep of idle locks.
const PRUNE_THRESHOLD: usize = 1024;

type Slot = Arc<tokio::sync::Mutex<()>>;

/// One async mutex per property, created on first use.
#[derive(Clone, Default)]
pub struct PropertyLocks {
    slots: Arc<Mutex<HashMap<Uuid, Slot>>>,
}

impl PropertyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, property_id: Uuid) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if slots.len() >= PRUNE_THRESHOLD {
            let before = slots.len();
            // The map's own reference is the only one left on idle slots.
            slots.retain(|_, slot| Arc::strong_count(slot) > 1);
            debug!(before, after = slots.len(), "pruned idle property locks");
        }
        slots.entry(property_id).or_default().clone()
    }

    /// Wait at most `limit` for exclusive access to `property_id`.
    /// The lock is released when the guard drops.
    pub async fn acquire(
        &self,
        property_id: Uuid,
        limit: Duration,
    ) -> HearthResult<OwnedMutexGuard<()>> {
        let slot = self.slot(property_id);
        within(limit, "property.lock", async move { Ok(slot.lock_owned().await) }).await
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[cfg(test)]
mod tests {
    use hearth_core::error::HearthError;

    use super::*;

    const LIMIT: Duration = Duration::from_millis(100);

    #[tokio::test]
    async fn same_property_is_exclusive() {
        let locks = PropertyLocks::new();
        let id = Uuid::new_v4();

        let held = locks.acquire(id, LIMIT).await.unwrap();
        let err = locks.acquire(id, LIMIT).await.unwrap_err();
        assert!(matches!(err, HearthError::Timeout { .. }));

        drop(held);
        locks.acquire(id, LIMIT).await.unwrap();
    }

    #[tokio::test]
    async fn different_properties_do_not_contend() {
        let locks = PropertyLocks::new();
        let _a = locks.acquire(Uuid::new_v4(), LIMIT).await.unwrap();
        let _b = locks.acquire(Uuid::new_v4(), LIMIT).await.unwrap();
    }

    #[tokio::test]
    async fn idle_slots_are_pruned() {
        let locks = PropertyLocks::new();
        let busy = Uuid::new_v4();
        let _guard = locks.acquire(busy, LIMIT).await.unwrap();
        for _ in 0..PRUNE_THRESHOLD {
            drop(locks.acquire(Uuid::new_v4(), LIMIT).await.unwrap());
        }
        // The sweep ran once the map filled up; the held slot survived.
        assert!(locks.len() < PRUNE_THRESHOLD);
        let err = locks.acquire(busy, LIMIT).await.unwrap_err();
        assert!(matches!(err, HearthError::Timeout { .. }));
    }
}
