//! Read-only reference data: foods and activities.

use serde::{Deserialize, Serialize};

use super::ids::{ActivityId, FoodId};

/// Something a pet can eat. Feeding raises hunger by `nutrition_value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    pub id: FoodId,
    pub name: String,
    pub nutrition_value: u32,
}

/// Something a pet can do. Playing raises happiness by `happiness_boost`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub name: String,
    pub happiness_boost: u32,
}
