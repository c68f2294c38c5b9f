//! Port for read-only catalog lookups.

use async_trait::async_trait;

use crate::domain::{Activity, ActivityId, Food, FoodId, PetType, PetTypeId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by catalog adapters.
    pub enum ActionCatalogError {
        /// Catalog connection could not be established.
        Connection { message: String } =>
            "action catalog connection failed: {message}",
        /// Lookup failed during execution.
        Query { message: String } =>
            "action catalog query failed: {message}",
    }
}

/// Port for resolving foods, activities and pet types.
///
/// A missing row is an expected outcome and is reported as `Ok(None)`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActionCatalog: Send + Sync {
    async fn lookup_food(&self, food_id: FoodId) -> Result<Option<Food>, ActionCatalogError>;

    async fn lookup_activity(
        &self,
        activity_id: ActivityId,
    ) -> Result<Option<Activity>, ActionCatalogError>;

    async fn lookup_pet_type(
        &self,
        pet_type_id: PetTypeId,
    ) -> Result<Option<PetType>, ActionCatalogError>;

    /// All foods, ordered by id.
    async fn list_foods(&self) -> Result<Vec<Food>, ActionCatalogError>;

    /// All activities, ordered by id.
    async fn list_activities(&self) -> Result<Vec<Activity>, ActionCatalogError>;

    /// All pet types, ordered by id.
    async fn list_pet_types(&self) -> Result<Vec<PetType>, ActionCatalogError>;
}
