//! Pet vital-stats engine.
//!
//! [`PetCareService`] implements feed, play and decay on top of the
//! driven ports. Feed and play prefer the store's atomic path, which logs
//! the action and raises the statistic in one transaction. When the store
//! reports that path as unsupported the service writes the ledger entry
//! first and adjusts the statistic second; a failure between the two
//! leaves the entry in place and is logged with `consistency = "partial"`.

mod error;
mod locks;
mod runtime;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, error, warn};

use crate::domain::ports::{
    AtomicActionOutcome, DecayRequest, DecayResponse, FeedRequest, FeedResponse, PetCareCommand,
    PetCareQuery, PetStatus, PlayRequest, PlayResponse,
};
use crate::domain::{
    Activity, ActivityId, Error, Food, FoodId, HistoryQuery, HistoryRecord, LedgerAction,
    NewLedgerEntry, Pet, PetId, PetType, StatAdjustment, StatKind, UserId,
};

pub use error::PetCareError;
pub(crate) use error::{StorageFailure, within_deadline};
pub use locks::{PetGuard, PetLocks};
pub use runtime::{DecayTargetPicker, PetCarePorts, PetCareRuntime, UniformDecayTarget};

/// Hunger removed from one pet per decay tick.
pub const DECAY_AMOUNT: u32 = 10;

/// Tunables for [`PetCareService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PetCareConfig {
    /// Upper bound on any single storage call.
    pub storage_timeout: Duration,
}

impl Default for PetCareConfig {
    fn default() -> Self {
        Self {
            storage_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum CareItem {
    Food(FoodId),
    Activity(ActivityId),
}

/// A resolved feed or play, carrying the catalog row that drives it.
#[derive(Debug, Clone)]
enum CareAction {
    Feed(Food),
    Play(Activity),
}

impl CareAction {
    fn stat(&self) -> StatKind {
        match self {
            Self::Feed(_) => StatKind::Hunger,
            Self::Play(_) => StatKind::Happiness,
        }
    }

    fn amount(&self) -> u32 {
        match self {
            Self::Feed(food) => food.nutrition_value,
            Self::Play(activity) => activity.happiness_boost,
        }
    }

    fn ledger_action(&self) -> LedgerAction {
        match self {
            Self::Feed(food) => LedgerAction::Fed(food.id),
            Self::Play(activity) => LedgerAction::Played(activity.id),
        }
    }

    fn adjustment(&self) -> StatAdjustment {
        StatAdjustment::increase(self.stat(), self.amount())
    }

    fn message(&self) -> String {
        match self {
            Self::Feed(food) => format!(
                "Pet has been fed with {}! (+{} hunger)",
                food.name, food.nutrition_value
            ),
            Self::Play(activity) => format!(
                "You played {} with the pet! (+{} happiness)",
                activity.name, activity.happiness_boost
            ),
        }
    }
}

/// Stats engine implementing [`PetCareCommand`] and [`PetCareQuery`].
#[derive(Clone)]
pub struct PetCareService {
    ports: PetCarePorts,
    clock: Arc<dyn Clock>,
    runtime: PetCareRuntime,
    config: PetCareConfig,
}

impl PetCareService {
    /// Build a service with uniform random decay targeting and a private
    /// lock registry.
    pub fn new(ports: PetCarePorts, clock: Arc<dyn Clock>, config: PetCareConfig) -> Self {
        Self::with_runtime(ports, clock, PetCareRuntime::default(), config)
    }

    /// Build a service with injected runtime helpers.
    pub fn with_runtime(
        ports: PetCarePorts,
        clock: Arc<dyn Clock>,
        runtime: PetCareRuntime,
        config: PetCareConfig,
    ) -> Self {
        Self {
            ports,
            clock,
            runtime,
            config,
        }
    }

    /// Lock registry, for other services that must serialise with care
    /// actions.
    #[must_use]
    pub fn locks(&self) -> Arc<PetLocks> {
        Arc::clone(&self.runtime.locks)
    }

    async fn call<T, E, F>(&self, operation: &'static str, call: F) -> Result<T, PetCareError>
    where
        F: std::future::Future<Output = Result<T, E>>,
        E: StorageFailure,
    {
        within_deadline(self.config.storage_timeout, operation, call).await
    }

    async fn load_pet(&self, pet_id: PetId) -> Result<Pet, PetCareError> {
        self.call("load pet", self.ports.pets.find_by_id(pet_id))
            .await?
            .ok_or(PetCareError::PetNotFound { pet_id })
    }

    async fn resolve(&self, item: CareItem) -> Result<CareAction, PetCareError> {
        match item {
            CareItem::Food(food_id) => self
                .call("lookup food", self.ports.catalog.lookup_food(food_id))
                .await?
                .map(CareAction::Feed)
                .ok_or(PetCareError::FoodNotFound { food_id }),
            CareItem::Activity(activity_id) => self
                .call("lookup activity", self.ports.catalog.lookup_activity(activity_id))
                .await?
                .map(CareAction::Play)
                .ok_or(PetCareError::ActivityNotFound { activity_id }),
        }
    }

    /// Resolve the pet and the item, then log and apply the action while
    /// holding the pet's lock.
    async fn apply_care(
        &self,
        pet_id: PetId,
        item: CareItem,
    ) -> Result<(CareAction, Pet), PetCareError> {
        let _guard = self.runtime.locks.acquire(pet_id).await;
        let pet = self.load_pet(pet_id).await?;
        let action = self.resolve(item).await?;
        let entry = NewLedgerEntry {
            pet_id: pet.id(),
            action: action.ledger_action(),
            recorded_at: self.clock.utc(),
        };
        let adjustment = action.adjustment();

        let outcome = self
            .call("record and adjust", self.ports.pets.record_and_adjust(&entry, adjustment))
            .await?;
        let updated = match outcome {
            AtomicActionOutcome::Applied { pet, entry } => {
                debug!(pet_id = %pet.id(), entry_id = %entry.id, path = "atomic", "care action applied");
                pet
            }
            AtomicActionOutcome::PetMissing => return Err(PetCareError::PetNotFound { pet_id }),
            AtomicActionOutcome::Unsupported => self.apply_in_two_steps(&entry, adjustment).await?,
        };
        Ok((action, updated))
    }

    async fn apply_in_two_steps(
        &self,
        entry: &NewLedgerEntry,
        adjustment: StatAdjustment,
    ) -> Result<Pet, PetCareError> {
        let pet_id = entry.pet_id;
        let recorded = self
            .call("record ledger entry", self.ports.ledger.record(entry))
            .await?;

        let adjusted = self
            .call("adjust stat", self.ports.pets.adjust_stat(pet_id, adjustment))
            .await;
        match adjusted {
            Ok(Some(pet)) => {
                debug!(%pet_id, entry_id = %recorded.id, path = "fallback", "care action applied");
                Ok(pet)
            }
            Ok(None) => {
                error!(
                    %pet_id,
                    entry_id = %recorded.id,
                    consistency = "partial",
                    "pet disappeared after its ledger entry was written"
                );
                Err(PetCareError::PetNotFound { pet_id })
            }
            Err(err) => {
                error!(
                    %pet_id,
                    entry_id = %recorded.id,
                    stat = %adjustment.kind(),
                    consistency = "partial",
                    error = %err,
                    "stat update failed after ledger entry was written"
                );
                Err(PetCareError::PartialConsistency {
                    pet_id,
                    entry_id: recorded.id,
                    stat: adjustment.kind(),
                    message: err.to_string(),
                })
            }
        }
    }

    /// Lower the hunger of one of the user's pets, chosen by the picker.
    ///
    /// Returns `Ok(None)` when the user has no pets, or when the chosen pet
    /// was deleted before the update ran.
    pub async fn decay_once(&self, user_id: UserId) -> Result<Option<Pet>, PetCareError> {
        let candidates = self
            .call("list pet ids", self.ports.pets.list_ids_for_user(user_id))
            .await?;
        let Some(pet_id) = self.runtime.picker.pick(&candidates) else {
            return Ok(None);
        };
        let _guard = self.runtime.locks.acquire(pet_id).await;
        self.call(
            "decay hunger",
            self.ports
                .pets
                .adjust_stat(pet_id, StatAdjustment::decrease(StatKind::Hunger, DECAY_AMOUNT)),
        )
        .await
    }
}

/// Convert an engine failure for the caller, logging storage trouble.
///
/// Partial-consistency failures were already logged at the split point.
fn report(operation: &'static str, err: PetCareError) -> Error {
    if matches!(
        err,
        PetCareError::StorageUnavailable { .. } | PetCareError::StorageFailed { .. }
    ) {
        warn!(operation, error = %err, "pet care operation failed");
    }
    err.into()
}

#[async_trait]
impl PetCareCommand for PetCareService {
    async fn feed(&self, request: FeedRequest) -> Result<FeedResponse, Error> {
        let (action, pet) = self
            .apply_care(request.pet_id, CareItem::Food(request.food_id))
            .await
            .map_err(|err| report("feed", err))?;
        Ok(FeedResponse {
            message: action.message(),
            nutrition_gained: action.amount(),
            pet: pet.into(),
        })
    }

    async fn play(&self, request: PlayRequest) -> Result<PlayResponse, Error> {
        let (action, pet) = self
            .apply_care(request.pet_id, CareItem::Activity(request.activity_id))
            .await
            .map_err(|err| report("play", err))?;
        Ok(PlayResponse {
            message: action.message(),
            happiness_gained: action.amount(),
            pet: pet.into(),
        })
    }

    async fn decay(&self, request: DecayRequest) -> Result<DecayResponse, Error> {
        let updated = self
            .decay_once(request.user_id)
            .await
            .map_err(|err| report("decay", err))?;
        Ok(match updated {
            Some(pet) => DecayResponse {
                message: format!("Decreased hunger for 1 pet (-{DECAY_AMOUNT})"),
                updated_pet: Some(pet.into()),
            },
            None => DecayResponse {
                message: "No pets found for this user".to_owned(),
                updated_pet: None,
            },
        })
    }
}

#[async_trait]
impl PetCareQuery for PetCareService {
    async fn status(&self, pet_id: PetId) -> Result<PetStatus, Error> {
        let pet = self
            .load_pet(pet_id)
            .await
            .map_err(|err| report("status", err))?;
        Ok(pet.into())
    }

    async fn history(&self, query: HistoryQuery) -> Result<Vec<HistoryRecord>, Error> {
        self.call("read history", self.ports.ledger.history(&query))
            .await
            .map_err(|err| report("history", err))
    }

    async fn foods(&self) -> Result<Vec<Food>, Error> {
        self.call("list foods", self.ports.catalog.list_foods())
            .await
            .map_err(|err| report("foods", err))
    }

    async fn activities(&self) -> Result<Vec<Activity>, Error> {
        self.call("list activities", self.ports.catalog.list_activities())
            .await
            .map_err(|err| report("activities", err))
    }

    async fn pet_types(&self) -> Result<Vec<PetType>, Error> {
        self.call("list pet types", self.ports.catalog.list_pet_types())
            .await
            .map_err(|err| report("pet types", err))
    }
}

#[cfg(test)]
mod tests;
