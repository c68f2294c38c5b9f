//! Port for pet persistence and statistic mutation.

use async_trait::async_trait;

use crate::domain::{
    LedgerEntry, NewLedgerEntry, NewPet, Pet, PetId, StatAdjustment, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by pet repository adapters.
    pub enum PetRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "pet repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "pet repository query failed: {message}",
    }
}

/// Result of asking the store to log an action and adjust a stat together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtomicActionOutcome {
    /// Both writes committed in one transaction.
    Applied { pet: Pet, entry: LedgerEntry },
    /// The pet vanished before the transaction ran; nothing was written.
    PetMissing,
    /// The store cannot combine the writes; callers fall back to two steps.
    Unsupported,
}

/// Port for reading pets and mutating their vital statistics.
///
/// Adjustments are applied as a single read-modify-write inside the store
/// and always clamp to `0..=100`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PetRepository: Send + Sync {
    /// Find a pet, joined with its type.
    async fn find_by_id(&self, pet_id: PetId) -> Result<Option<Pet>, PetRepositoryError>;

    /// Every pet owned by `user_id`, ordered by id.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Pet>, PetRepositoryError>;

    /// Ids of every pet owned by `user_id`.
    async fn list_ids_for_user(&self, user_id: UserId)
    -> Result<Vec<PetId>, PetRepositoryError>;

    /// Insert a new pet at default statistics.
    ///
    /// Returns `Ok(None)` when the referenced pet type does not exist.
    async fn insert(&self, pet: &NewPet) -> Result<Option<Pet>, PetRepositoryError>;

    /// Hard-delete a pet. Returns `false` when no row matched.
    ///
    /// Ledger entries for the pet are left in place.
    async fn delete(&self, pet_id: PetId) -> Result<bool, PetRepositoryError>;

    /// Apply a clamped adjustment, returning the updated pet or `None` if
    /// the pet does not exist.
    async fn adjust_stat(
        &self,
        pet_id: PetId,
        adjustment: StatAdjustment,
    ) -> Result<Option<Pet>, PetRepositoryError>;

    /// Record `entry` and apply `adjustment` in one transaction, if the store
    /// supports it.
    async fn record_and_adjust(
        &self,
        entry: &NewLedgerEntry,
        adjustment: StatAdjustment,
    ) -> Result<AtomicActionOutcome, PetRepositoryError>;
}
