//! Diesel row structs and their conversion into domain values.
//!
//! Rows never leave the persistence module. Conversions validate ids and
//! statistic ranges so a corrupt row surfaces as a query error rather than
//! an out-of-range `VitalStat`.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{
    Activity, ActivityId, Food, FoodId, LedgerEntryId, NewPet, Pet, PetDraft, PetId, PetType,
    PetTypeId, UserId, VitalStat,
};

use super::schema::{activities, foods, pet_activity_log, pet_feeding_log, pet_types, pets};

/// Why a stored row could not become a domain value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {table} row: {message}")]
pub(crate) struct RowConversionError {
    table: &'static str,
    message: String,
}

impl RowConversionError {
    fn new(table: &'static str, err: impl std::fmt::Display) -> Self {
        Self {
            table,
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = pet_types)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PetTypeRow {
    pub pet_type_id: i64,
    pub type_name: String,
}

impl TryFrom<PetTypeRow> for PetType {
    type Error = RowConversionError;

    fn try_from(row: PetTypeRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PetTypeId::new(row.pet_type_id).map_err(|e| RowConversionError::new("pet_types", e))?,
            name: row.type_name,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = pets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PetRow {
    pub pet_id: i64,
    pub user_id: i64,
    pub pet_name: String,
    pub pet_type_id: i64,
    pub age: i32,
    pub happiness_level: i32,
    pub hunger_level: i32,
}

impl PetRow {
    /// Combine with the joined type row.
    pub(crate) fn into_pet(self, type_row: PetTypeRow) -> Result<Pet, RowConversionError> {
        let convert = |e: &dyn std::fmt::Display| RowConversionError::new("pets", e);
        if self.pet_type_id != type_row.pet_type_id {
            return Err(convert(&"joined pet type does not match pet_type_id"));
        }
        Ok(Pet::new(PetDraft {
            id: PetId::new(self.pet_id).map_err(|e| convert(&e))?,
            user_id: UserId::new(self.user_id).map_err(|e| convert(&e))?,
            name: self.pet_name,
            pet_type: PetType::try_from(type_row)?,
            age: u32::try_from(self.age).map_err(|e| convert(&e))?,
            hunger: VitalStat::try_from(i64::from(self.hunger_level)).map_err(|e| convert(&e))?,
            happiness: VitalStat::try_from(i64::from(self.happiness_level))
                .map_err(|e| convert(&e))?,
        }))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pets)]
pub(crate) struct NewPetRow<'a> {
    pub user_id: i64,
    pub pet_name: &'a str,
    pub pet_type_id: i64,
    pub age: i32,
}

impl<'a> NewPetRow<'a> {
    pub(crate) fn from_domain(pet: &'a NewPet) -> Result<Self, RowConversionError> {
        Ok(Self {
            user_id: pet.user_id().get(),
            pet_name: pet.name(),
            pet_type_id: pet.pet_type_id().get(),
            age: i32::try_from(pet.age()).map_err(|e| RowConversionError::new("pets", e))?,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = foods)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FoodRow {
    pub food_id: i64,
    pub food_name: String,
    pub nutrition_value: i32,
}

impl TryFrom<FoodRow> for Food {
    type Error = RowConversionError;

    fn try_from(row: FoodRow) -> Result<Self, Self::Error> {
        let convert = |e: &dyn std::fmt::Display| RowConversionError::new("foods", e);
        Ok(Self {
            id: FoodId::new(row.food_id).map_err(|e| convert(&e))?,
            name: row.food_name,
            nutrition_value: u32::try_from(row.nutrition_value).map_err(|e| convert(&e))?,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = activities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ActivityRow {
    pub activity_id: i64,
    pub activity_name: String,
    pub happiness_boost: i32,
}

impl TryFrom<ActivityRow> for Activity {
    type Error = RowConversionError;

    fn try_from(row: ActivityRow) -> Result<Self, Self::Error> {
        let convert = |e: &dyn std::fmt::Display| RowConversionError::new("activities", e);
        Ok(Self {
            id: ActivityId::new(row.activity_id).map_err(|e| convert(&e))?,
            name: row.activity_name,
            happiness_boost: u32::try_from(row.happiness_boost).map_err(|e| convert(&e))?,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pet_feeding_log)]
pub(crate) struct NewFeedingLogRow {
    pub pet_id: i64,
    pub food_id: i64,
    pub fed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pet_activity_log)]
pub(crate) struct NewActivityLogRow {
    pub pet_id: i64,
    pub activity_id: i64,
    pub played_at: DateTime<Utc>,
}

/// Joined history row: `(log_id, pet_id, pet_name, item_name, timestamp)`.
pub(crate) type HistoryRow = (i64, i64, String, String, DateTime<Utc>);

pub(crate) fn ledger_entry_id(raw: i64) -> Result<LedgerEntryId, RowConversionError> {
    LedgerEntryId::new(raw).map_err(|e| RowConversionError::new("ledger", e))
}

pub(crate) fn history_pet_id(raw: i64) -> Result<PetId, RowConversionError> {
    PetId::new(raw).map_err(|e| RowConversionError::new("ledger", e))
}
