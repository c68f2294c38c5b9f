//! Driving port for actions that change a pet's vital statistics.
//!
//! Feeding and playing resolve the pet and the catalog item, append a
//! ledger entry and raise the matching statistic. Decay lowers the hunger
//! of one randomly chosen pet and leaves the ledger alone.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{ActivityId, Error, FoodId, Pet, PetId, UserId};

/// Serializable pet snapshot shared by driving ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetPayload {
    pub pet_id: PetId,
    pub user_id: UserId,
    pub pet_name: String,
    pub pet_type_id: i64,
    pub type_name: String,
    pub age: u32,
    pub hunger_level: u8,
    pub happiness_level: u8,
}

impl From<Pet> for PetPayload {
    fn from(pet: Pet) -> Self {
        Self {
            pet_id: pet.id(),
            user_id: pet.user_id(),
            pet_type_id: pet.pet_type().id.get(),
            type_name: pet.pet_type().name.clone(),
            age: pet.age(),
            hunger_level: pet.hunger().value(),
            happiness_level: pet.happiness().value(),
            pet_name: pet.name().to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedRequest {
    pub pet_id: PetId,
    pub food_id: FoodId,
}

/// Outcome of a feed. `nutrition_gained` is the catalog value, not the
/// clamped change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedResponse {
    pub message: String,
    pub nutrition_gained: u32,
    pub pet: PetPayload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayRequest {
    pub pet_id: PetId,
    pub activity_id: ActivityId,
}

/// Outcome of a play. `happiness_gained` is the catalog value, not the
/// clamped change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayResponse {
    pub message: String,
    pub happiness_gained: u32,
    pub pet: PetPayload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecayRequest {
    pub user_id: UserId,
}

/// Outcome of one decay tick. `updated_pet` is absent when the user owns
/// no pets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecayResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_pet: Option<PetPayload>,
}

/// Port for feed, play and decay.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PetCareCommand: Send + Sync {
    async fn feed(&self, request: FeedRequest) -> Result<FeedResponse, Error>;

    async fn play(&self, request: PlayRequest) -> Result<PlayResponse, Error>;

    async fn decay(&self, request: DecayRequest) -> Result<DecayResponse, Error>;
}
