//! Per-pet mutual exclusion.
//!
//! Feed, play, decay and delete on the same pet run one at a time; work on
//! different pets never contends. Entries are weak so idle pets do not pin
//! memory.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::PetId;

/// Registry of one async mutex per pet id.
#[derive(Debug, Default)]
pub struct PetLocks {
    slots: Mutex<HashMap<PetId, Weak<AsyncMutex<()>>>>,
}

/// Held for the duration of one operation on a pet.
pub type PetGuard = OwnedMutexGuard<()>;

impl PetLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `pet_id`.
    pub async fn acquire(&self, pet_id: PetId) -> PetGuard {
        self.slot(pet_id).lock_owned().await
    }

    fn slot(&self, pet_id: PetId) -> Arc<AsyncMutex<()>> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = slots.get(&pet_id).and_then(Weak::upgrade) {
            return existing;
        }
        slots.retain(|_, slot| slot.strong_count() > 0);
        let fresh = Arc::new(AsyncMutex::new(()));
        slots.insert(pet_id, Arc::downgrade(&fresh));
        fresh
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn pet(raw: i64) -> PetId {
        PetId::new(raw).expect("pet id")
    }

    #[tokio::test]
    async fn same_pet_is_exclusive() {
        let locks = PetLocks::new();
        let _held = locks.acquire(pet(1)).await;
        let second = tokio::time::timeout(Duration::from_millis(20), locks.acquire(pet(1))).await;
        assert!(second.is_err(), "second acquire must wait");
    }

    #[tokio::test]
    async fn different_pets_do_not_block() {
        let locks = PetLocks::new();
        let _first = locks.acquire(pet(1)).await;
        let other = tokio::time::timeout(Duration::from_millis(20), locks.acquire(pet(2))).await;
        assert!(other.is_ok());
    }

    #[tokio::test]
    async fn released_slots_are_pruned() {
        let locks = PetLocks::new();
        drop(locks.acquire(pet(1)).await);
        drop(locks.acquire(pet(2)).await);
        assert_eq!(locks.tracked(), 1);
    }
}
