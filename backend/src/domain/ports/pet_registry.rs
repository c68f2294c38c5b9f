//! Driving port for adding, listing and removing pets.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, PetId, PetTypeId, UserId};

use super::PetPayload;

/// Unvalidated request to register a pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddPetRequest {
    pub user_id: UserId,
    pub pet_name: String,
    pub pet_type_id: PetTypeId,
    pub age: i64,
}

/// Port for the pet lifecycle around the stats engine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PetRegistry: Send + Sync {
    /// Register a pet at default statistics.
    async fn add_pet(&self, request: AddPetRequest) -> Result<PetPayload, Error>;

    /// Every pet owned by `user_id`.
    async fn list_pets(&self, user_id: UserId) -> Result<Vec<PetPayload>, Error>;

    /// Hard-delete a pet. Ledger history is retained.
    async fn delete_pet(&self, pet_id: PetId) -> Result<(), Error>;
}
