//! Driving port for reading pet status and ledger history.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Activity, Error, Food, HistoryQuery, HistoryRecord, Pet, PetId, PetType};

/// Current status of one pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetStatus {
    pub pet_id: PetId,
    pub pet_name: String,
    pub pet_type: String,
    pub age: u32,
    pub happiness_level: u8,
    pub hunger_level: u8,
}

impl From<Pet> for PetStatus {
    fn from(pet: Pet) -> Self {
        Self {
            pet_id: pet.id(),
            pet_name: pet.name().to_owned(),
            pet_type: pet.pet_type().name.clone(),
            age: pet.age(),
            happiness_level: pet.happiness().value(),
            hunger_level: pet.hunger().value(),
        }
    }
}

/// Port for side-effect free reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PetCareQuery: Send + Sync {
    async fn status(&self, pet_id: PetId) -> Result<PetStatus, Error>;

    async fn history(&self, query: HistoryQuery) -> Result<Vec<HistoryRecord>, Error>;

    /// Foods that can be fed, ordered by id.
    async fn foods(&self) -> Result<Vec<Food>, Error>;

    /// Activities that can be played, ordered by id.
    async fn activities(&self) -> Result<Vec<Activity>, Error>;

    /// Pet types accepted when registering a pet, ordered by id.
    async fn pet_types(&self) -> Result<Vec<PetType>, Error>;
}
