//! Pet lifecycle service: add, list and delete.
//!
//! Deletion takes the pet's lock so it serialises with in-flight care
//! actions. Ledger history of a deleted pet stays in storage.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::pet_care::{PetCareError, PetLocks, within_deadline};
use crate::domain::ports::{
    ActionCatalog, AddPetRequest, PetPayload, PetRegistry, PetRepository,
};
use crate::domain::{Error, NewPet, PetId, UserId};

fn report(operation: &'static str, err: PetCareError) -> Error {
    if matches!(
        err,
        PetCareError::StorageUnavailable { .. } | PetCareError::StorageFailed { .. }
    ) {
        warn!(operation, error = %err, "pet registry operation failed");
    }
    err.into()
}

/// Service implementing the [`PetRegistry`] driving port.
///
/// Generic over its ports; use `dyn PetRepository` and `dyn ActionCatalog`
/// when the adapter is chosen at runtime.
pub struct PetRegistryService<P: ?Sized, C: ?Sized> {
    pets: Arc<P>,
    catalog: Arc<C>,
    locks: Arc<PetLocks>,
    storage_timeout: Duration,
}

impl<P: ?Sized, C: ?Sized> PetRegistryService<P, C> {
    /// Create the service. Pass the engine's lock registry so deletes and
    /// care actions on the same pet do not interleave.
    pub fn new(
        pets: Arc<P>,
        catalog: Arc<C>,
        locks: Arc<PetLocks>,
        storage_timeout: Duration,
    ) -> Self {
        Self {
            pets,
            catalog,
            locks,
            storage_timeout,
        }
    }
}

impl<P, C> PetRegistryService<P, C>
where
    P: PetRepository + ?Sized,
    C: ActionCatalog + ?Sized,
{
    async fn add(&self, request: AddPetRequest) -> Result<PetPayload, PetCareError> {
        let AddPetRequest {
            user_id,
            pet_name,
            pet_type_id,
            age,
        } = request;
        let new_pet = NewPet::new(user_id, &pet_name, pet_type_id, age)?;
        within_deadline(
            self.storage_timeout,
            "lookup pet type",
            self.catalog.lookup_pet_type(pet_type_id),
        )
        .await?
        .ok_or(PetCareError::PetTypeNotFound { pet_type_id })?;

        let pet = within_deadline(self.storage_timeout, "insert pet", self.pets.insert(&new_pet))
            .await?
            .ok_or(PetCareError::PetTypeNotFound { pet_type_id })?;
        info!(pet_id = %pet.id(), %user_id, "pet added");
        Ok(pet.into())
    }

    async fn delete(&self, pet_id: PetId) -> Result<(), PetCareError> {
        let _guard = self.locks.acquire(pet_id).await;
        let removed =
            within_deadline(self.storage_timeout, "delete pet", self.pets.delete(pet_id)).await?;
        if removed {
            info!(%pet_id, "pet deleted; ledger history retained");
            Ok(())
        } else {
            Err(PetCareError::PetNotFound { pet_id })
        }
    }
}

#[async_trait]
impl<P, C> PetRegistry for PetRegistryService<P, C>
where
    P: PetRepository + ?Sized,
    C: ActionCatalog + ?Sized,
{
    async fn add_pet(&self, request: AddPetRequest) -> Result<PetPayload, Error> {
        self.add(request).await.map_err(|err| report("add pet", err))
    }

    async fn list_pets(&self, user_id: UserId) -> Result<Vec<PetPayload>, Error> {
        let pets = within_deadline(
            self.storage_timeout,
            "list pets",
            self.pets.list_for_user(user_id),
        )
        .await
        .map_err(|err| report("list pets", err))?;
        Ok(pets.into_iter().map(PetPayload::from).collect())
    }

    async fn delete_pet(&self, pet_id: PetId) -> Result<(), Error> {
        self.delete(pet_id)
            .await
            .map_err(|err| report("delete pet", err))
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::{MockActionCatalog, MockPetRepository, PetRepositoryError};
    use crate::domain::{ErrorCode, PetType, PetTypeId};

    fn service(
        pets: MockPetRepository,
        catalog: MockActionCatalog,
    ) -> PetRegistryService<MockPetRepository, MockActionCatalog> {
        PetRegistryService::new(
            Arc::new(pets),
            Arc::new(catalog),
            Arc::new(PetLocks::new()),
            Duration::from_secs(1),
        )
    }

    fn dog() -> PetType {
        PetType {
            id: PetTypeId::new(1).expect("type id"),
            name: "Dog".to_owned(),
        }
    }

    fn request(name: &str, age: i64) -> AddPetRequest {
        AddPetRequest {
            user_id: UserId::new(4).expect("user id"),
            pet_name: name.to_owned(),
            pet_type_id: dog().id,
            age,
        }
    }

    #[tokio::test]
    async fn add_pet_starts_at_default_stats() {
        let mut pets = MockPetRepository::new();
        let mut catalog = MockActionCatalog::new();
        catalog
            .expect_lookup_pet_type()
            .with(eq(dog().id))
            .return_once(|_| Ok(Some(dog())));
        pets.expect_insert().times(1).returning(|new_pet| {
            Ok(Some(
                new_pet
                    .clone()
                    .into_pet(PetId::new(12).expect("pet id"), dog()),
            ))
        });

        let pet = service(pets, catalog)
            .add_pet(request("Biscuit", 2))
            .await
            .expect("pet added");

        assert_eq!(pet.pet_name, "Biscuit");
        assert_eq!(pet.type_name, "Dog");
        assert_eq!((pet.hunger_level, pet.happiness_level), (50, 50));
    }

    #[rstest]
    #[case("  ", 1)]
    #[case("Biscuit", -3)]
    #[tokio::test]
    async fn invalid_input_never_reaches_storage(#[case] name: &str, #[case] age: i64) {
        let mut pets = MockPetRepository::new();
        let mut catalog = MockActionCatalog::new();
        pets.expect_insert().times(0);
        catalog.expect_lookup_pet_type().times(0);

        let error = service(pets, catalog)
            .add_pet(request(name, age))
            .await
            .expect_err("validation failure");

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn unknown_pet_type_is_rejected() {
        let mut pets = MockPetRepository::new();
        let mut catalog = MockActionCatalog::new();
        catalog.expect_lookup_pet_type().return_once(|_| Ok(None));
        pets.expect_insert().times(0);

        let error = service(pets, catalog)
            .add_pet(request("Biscuit", 1))
            .await
            .expect_err("unknown type");

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(error.message(), "Pet type not found");
    }

    #[tokio::test]
    async fn deleting_a_missing_pet_is_not_found() {
        let mut pets = MockPetRepository::new();
        pets.expect_delete().return_once(|_| Ok(false));

        let error = service(pets, MockActionCatalog::new())
            .delete_pet(PetId::new(3).expect("pet id"))
            .await
            .expect_err("missing pet");

        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn list_failure_is_service_unavailable() {
        let mut pets = MockPetRepository::new();
        pets.expect_list_for_user()
            .return_once(|_| Err(PetRepositoryError::connection("refused")));

        let error = service(pets, MockActionCatalog::new())
            .list_pets(UserId::new(4).expect("user id"))
            .await
            .expect_err("outage");

        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }
}
