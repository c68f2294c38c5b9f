//! PostgreSQL-backed `ActionCatalog` over the `foods`, `activities` and
//! `pet_types` reference tables.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ActionCatalog, ActionCatalogError};
use crate::domain::{Activity, ActivityId, Food, FoodId, PetType, PetTypeId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{ActivityRow, FoodRow, PetTypeRow, RowConversionError};
use super::pool::{DbPool, PoolError};
use super::schema::{activities, foods, pet_types};

/// Diesel-backed implementation of the `ActionCatalog` port.
#[derive(Clone)]
pub struct DieselActionCatalog {
    pool: DbPool,
}

impl DieselActionCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ActionCatalogError {
    map_basic_pool_error(error, ActionCatalogError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ActionCatalogError {
    map_basic_diesel_error(
        error,
        ActionCatalogError::query,
        ActionCatalogError::connection,
    )
}

fn convert<R, T>(row: R) -> Result<T, ActionCatalogError>
where
    T: TryFrom<R, Error = RowConversionError>,
{
    T::try_from(row).map_err(|err| ActionCatalogError::query(err.to_string()))
}

#[async_trait]
impl ActionCatalog for DieselActionCatalog {
    async fn lookup_food(&self, food_id: FoodId) -> Result<Option<Food>, ActionCatalogError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<FoodRow> = foods::table
            .filter(foods::food_id.eq(food_id.get()))
            .select(FoodRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(convert).transpose()
    }

    async fn lookup_activity(
        &self,
        activity_id: ActivityId,
    ) -> Result<Option<Activity>, ActionCatalogError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ActivityRow> = activities::table
            .filter(activities::activity_id.eq(activity_id.get()))
            .select(ActivityRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(convert).transpose()
    }

    async fn lookup_pet_type(
        &self,
        pet_type_id: PetTypeId,
    ) -> Result<Option<PetType>, ActionCatalogError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<PetTypeRow> = pet_types::table
            .filter(pet_types::pet_type_id.eq(pet_type_id.get()))
            .select(PetTypeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(convert).transpose()
    }

    async fn list_foods(&self) -> Result<Vec<Food>, ActionCatalogError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<FoodRow> = foods::table
            .order(foods::food_id.asc())
            .select(FoodRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(convert).collect()
    }

    async fn list_activities(&self) -> Result<Vec<Activity>, ActionCatalogError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ActivityRow> = activities::table
            .order(activities::activity_id.asc())
            .select(ActivityRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(convert).collect()
    }

    async fn list_pet_types(&self) -> Result<Vec<PetType>, ActionCatalogError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PetTypeRow> = pet_types::table
            .order(pet_types::pet_type_id.asc())
            .select(PetTypeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(convert).collect()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn invalid_rows_surface_as_query_errors() {
        let row = ActivityRow {
            activity_id: -1,
            activity_name: "Ghost".to_owned(),
            happiness_boost: 5,
        };
        let err = convert::<_, Activity>(row).expect_err("negative id");
        assert!(matches!(err, ActionCatalogError::Query { .. }));
    }

    #[rstest]
    fn valid_rows_convert() {
        let row = FoodRow {
            food_id: 1,
            food_name: "Kibble".to_owned(),
            nutrition_value: 20,
        };
        let food: Food = convert(row).expect("valid row");
        assert_eq!(food.nutrition_value, 20);
    }
}
