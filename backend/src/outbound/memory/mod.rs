//! In-memory adapter for the pet, ledger and catalog ports.
//!
//! The store keeps all state behind one mutex, so every adjustment is a
//! single critical section. It supports the atomic record-and-adjust path
//! unless built with [`InMemoryPetStore::without_atomic_actions`], and
//! exposes switches that make individual operations fail so callers can
//! exercise error handling without a database.

mod demo;

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{
    ActionCatalog, ActionCatalogError, AtomicActionOutcome, LedgerRepository,
    LedgerRepositoryError, PetRepository, PetRepositoryError,
};
use crate::domain::{
    Activity, ActivityId, Food, FoodId, HistoryQuery, HistoryRecord, HistoryScope, LedgerAction,
    LedgerEntry, LedgerEntryId, NewLedgerEntry, NewPet, Pet, PetId, PetType, PetTypeId,
    StatAdjustment, UserId, sort_newest_first,
};

pub use demo::CatalogSeed;

const OFFLINE: &str = "in-memory store is offline";

#[derive(Debug, Default)]
struct StoreState {
    pet_types: BTreeMap<PetTypeId, PetType>,
    foods: BTreeMap<FoodId, Food>,
    activities: BTreeMap<ActivityId, Activity>,
    pets: BTreeMap<PetId, Pet>,
    ledger: Vec<LedgerEntry>,
    last_pet_id: i64,
    last_entry_id: i64,
}

impl StoreState {
    fn next_pet_id(&mut self) -> Result<PetId, PetRepositoryError> {
        self.last_pet_id = self.last_pet_id.saturating_add(1);
        PetId::new(self.last_pet_id).map_err(|err| PetRepositoryError::query(err.to_string()))
    }

    fn append(&mut self, entry: &NewLedgerEntry) -> Result<LedgerEntry, String> {
        self.last_entry_id = self.last_entry_id.saturating_add(1);
        let id = LedgerEntryId::new(self.last_entry_id).map_err(|err| err.to_string())?;
        let stored = LedgerEntry::from_new(id, entry);
        self.ledger.push(stored.clone());
        Ok(stored)
    }

    fn adjust(&mut self, pet_id: PetId, adjustment: StatAdjustment) -> Option<Pet> {
        let pet = self.pets.get_mut(&pet_id)?;
        *pet = pet.clone().with_adjustment(adjustment);
        Some(pet.clone())
    }

    fn item_name(&self, action: LedgerAction) -> Option<&str> {
        match action {
            LedgerAction::Fed(food_id) => self.foods.get(&food_id).map(|f| f.name.as_str()),
            LedgerAction::Played(activity_id) => {
                self.activities.get(&activity_id).map(|a| a.name.as_str())
            }
        }
    }
}

#[derive(Debug, Default)]
struct Faults {
    offline: AtomicBool,
    ledger_writes: AtomicBool,
    stat_updates: AtomicBool,
}

/// Process-local store implementing every driven port.
///
/// # Examples
/// ```
/// use pet_backend::outbound::memory::{CatalogSeed, InMemoryPetStore};
///
/// let store = InMemoryPetStore::new(CatalogSeed::demo().expect("demo catalog"));
/// assert_eq!(store.ledger_len(), 0);
/// ```
#[derive(Debug)]
pub struct InMemoryPetStore {
    state: Mutex<StoreState>,
    atomic_actions: bool,
    faults: Faults,
}

impl Default for InMemoryPetStore {
    fn default() -> Self {
        Self::new(CatalogSeed::default())
    }
}

impl InMemoryPetStore {
    /// Empty store holding the given catalog.
    pub fn new(seed: CatalogSeed) -> Self {
        let CatalogSeed {
            pet_types,
            foods,
            activities,
        } = seed;
        let state = StoreState {
            pet_types: pet_types.into_iter().map(|t| (t.id, t)).collect(),
            foods: foods.into_iter().map(|f| (f.id, f)).collect(),
            activities: activities.into_iter().map(|a| (a.id, a)).collect(),
            ..StoreState::default()
        };
        Self {
            state: Mutex::new(state),
            atomic_actions: true,
            faults: Faults::default(),
        }
    }

    /// Report the atomic path as unsupported, forcing the two-step
    /// fallback.
    #[must_use]
    pub fn without_atomic_actions(mut self) -> Self {
        self.atomic_actions = false;
        self
    }

    /// Fail every operation with a connection error while `offline`.
    pub fn set_offline(&self, offline: bool) {
        self.faults.offline.store(offline, Ordering::SeqCst);
    }

    /// Fail ledger appends with a query error.
    pub fn fail_ledger_writes(&self, fail: bool) {
        self.faults.ledger_writes.store(fail, Ordering::SeqCst);
    }

    /// Fail stat adjustments, atomic or not, with a query error.
    pub fn fail_stat_updates(&self, fail: bool) {
        self.faults.stat_updates.store(fail, Ordering::SeqCst);
    }

    /// Number of stored ledger entries, including those of deleted pets.
    #[must_use]
    pub fn ledger_len(&self) -> usize {
        self.state().ledger.len()
    }

    /// Stored ledger entries for `pet_id`, oldest first.
    #[must_use]
    pub fn ledger_entries_for(&self, pet_id: PetId) -> Vec<LedgerEntry> {
        self.state()
            .ledger
            .iter()
            .filter(|entry| entry.pet_id == pet_id)
            .cloned()
            .collect()
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_offline(&self) -> bool {
        self.faults.offline.load(Ordering::SeqCst)
    }

    fn pets_online(&self) -> Result<(), PetRepositoryError> {
        if self.is_offline() {
            return Err(PetRepositoryError::connection(OFFLINE));
        }
        Ok(())
    }

    fn stat_updates_allowed(&self) -> Result<(), PetRepositoryError> {
        if self.faults.stat_updates.load(Ordering::SeqCst) {
            return Err(PetRepositoryError::query("stat update rejected"));
        }
        Ok(())
    }
}

#[async_trait]
impl PetRepository for InMemoryPetStore {
    async fn find_by_id(&self, pet_id: PetId) -> Result<Option<Pet>, PetRepositoryError> {
        self.pets_online()?;
        Ok(self.state().pets.get(&pet_id).cloned())
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Pet>, PetRepositoryError> {
        self.pets_online()?;
        Ok(self
            .state()
            .pets
            .values()
            .filter(|pet| pet.user_id() == user_id)
            .cloned()
            .collect())
    }

    async fn list_ids_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<PetId>, PetRepositoryError> {
        self.pets_online()?;
        Ok(self
            .state()
            .pets
            .values()
            .filter(|pet| pet.user_id() == user_id)
            .map(Pet::id)
            .collect())
    }

    async fn insert(&self, pet: &NewPet) -> Result<Option<Pet>, PetRepositoryError> {
        self.pets_online()?;
        let mut state = self.state();
        let Some(pet_type) = state.pet_types.get(&pet.pet_type_id()).cloned() else {
            return Ok(None);
        };
        let id = state.next_pet_id()?;
        let created = pet.clone().into_pet(id, pet_type);
        state.pets.insert(id, created.clone());
        Ok(Some(created))
    }

    async fn delete(&self, pet_id: PetId) -> Result<bool, PetRepositoryError> {
        self.pets_online()?;
        Ok(self.state().pets.remove(&pet_id).is_some())
    }

    async fn adjust_stat(
        &self,
        pet_id: PetId,
        adjustment: StatAdjustment,
    ) -> Result<Option<Pet>, PetRepositoryError> {
        self.pets_online()?;
        self.stat_updates_allowed()?;
        Ok(self.state().adjust(pet_id, adjustment))
    }

    async fn record_and_adjust(
        &self,
        entry: &NewLedgerEntry,
        adjustment: StatAdjustment,
    ) -> Result<AtomicActionOutcome, PetRepositoryError> {
        self.pets_online()?;
        if !self.atomic_actions {
            return Ok(AtomicActionOutcome::Unsupported);
        }
        self.stat_updates_allowed()?;
        let mut state = self.state();
        if !state.pets.contains_key(&entry.pet_id) {
            return Ok(AtomicActionOutcome::PetMissing);
        }
        let recorded = state.append(entry).map_err(PetRepositoryError::query)?;
        let Some(pet) = state.adjust(entry.pet_id, adjustment) else {
            return Ok(AtomicActionOutcome::PetMissing);
        };
        Ok(AtomicActionOutcome::Applied {
            pet,
            entry: recorded,
        })
    }
}

#[async_trait]
impl LedgerRepository for InMemoryPetStore {
    async fn record(&self, entry: &NewLedgerEntry) -> Result<LedgerEntry, LedgerRepositoryError> {
        if self.is_offline() {
            return Err(LedgerRepositoryError::connection(OFFLINE));
        }
        if self.faults.ledger_writes.load(Ordering::SeqCst) {
            return Err(LedgerRepositoryError::query("ledger append rejected"));
        }
        self.state()
            .append(entry)
            .map_err(LedgerRepositoryError::query)
    }

    async fn history(
        &self,
        query: &HistoryQuery,
    ) -> Result<Vec<HistoryRecord>, LedgerRepositoryError> {
        if self.is_offline() {
            return Err(LedgerRepositoryError::connection(OFFLINE));
        }
        let state = self.state();
        let mut records: Vec<HistoryRecord> = state
            .ledger
            .iter()
            .filter(|entry| entry.action.history_kind() == query.kind)
            .filter_map(|entry| {
                let pet = state.pets.get(&entry.pet_id)?;
                let in_scope = match query.scope {
                    HistoryScope::Pet(pet_id) => pet.id() == pet_id,
                    HistoryScope::User(user_id) => pet.user_id() == user_id,
                };
                if !in_scope {
                    return None;
                }
                Some(HistoryRecord {
                    entry_id: entry.id,
                    pet_id: pet.id(),
                    pet_name: pet.name().to_owned(),
                    item_name: state.item_name(entry.action)?.to_owned(),
                    recorded_at: entry.recorded_at,
                })
            })
            .collect();
        sort_newest_first(&mut records);
        if let Some(limit) = query.limit {
            records.truncate(limit);
        }
        Ok(records)
    }
}

#[async_trait]
impl ActionCatalog for InMemoryPetStore {
    async fn lookup_food(&self, food_id: FoodId) -> Result<Option<Food>, ActionCatalogError> {
        if self.is_offline() {
            return Err(ActionCatalogError::connection(OFFLINE));
        }
        Ok(self.state().foods.get(&food_id).cloned())
    }

    async fn lookup_activity(
        &self,
        activity_id: ActivityId,
    ) -> Result<Option<Activity>, ActionCatalogError> {
        if self.is_offline() {
            return Err(ActionCatalogError::connection(OFFLINE));
        }
        Ok(self.state().activities.get(&activity_id).cloned())
    }

    async fn lookup_pet_type(
        &self,
        pet_type_id: PetTypeId,
    ) -> Result<Option<PetType>, ActionCatalogError> {
        if self.is_offline() {
            return Err(ActionCatalogError::connection(OFFLINE));
        }
        Ok(self.state().pet_types.get(&pet_type_id).cloned())
    }

    async fn list_foods(&self) -> Result<Vec<Food>, ActionCatalogError> {
        if self.is_offline() {
            return Err(ActionCatalogError::connection(OFFLINE));
        }
        Ok(self.state().foods.values().cloned().collect())
    }

    async fn list_activities(&self) -> Result<Vec<Activity>, ActionCatalogError> {
        if self.is_offline() {
            return Err(ActionCatalogError::connection(OFFLINE));
        }
        Ok(self.state().activities.values().cloned().collect())
    }

    async fn list_pet_types(&self) -> Result<Vec<PetType>, ActionCatalogError> {
        if self.is_offline() {
            return Err(ActionCatalogError::connection(OFFLINE));
        }
        Ok(self.state().pet_types.values().cloned().collect())
    }
}
