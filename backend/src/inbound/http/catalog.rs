//! Read-only catalog listings used to populate the UI pickers.

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Activity, Error, Food, PetType};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FoodBody {
    pub food_id: i64,
    #[schema(example = "Kibble")]
    pub food_name: String,
    pub nutrition_value: u32,
}

impl From<Food> for FoodBody {
    fn from(food: Food) -> Self {
        Self {
            food_id: food.id.get(),
            food_name: food.name,
            nutrition_value: food.nutrition_value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ActivityBody {
    pub activity_id: i64,
    #[schema(example = "Fetch")]
    pub activity_name: String,
    pub happiness_boost: u32,
}

impl From<Activity> for ActivityBody {
    fn from(activity: Activity) -> Self {
        Self {
            activity_id: activity.id.get(),
            activity_name: activity.name,
            happiness_boost: activity.happiness_boost,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PetTypeBody {
    pub pet_type_id: i64,
    #[schema(example = "Dog")]
    pub type_name: String,
}

impl From<PetType> for PetTypeBody {
    fn from(pet_type: PetType) -> Self {
        Self {
            pet_type_id: pet_type.id.get(),
            type_name: pet_type.name,
        }
    }
}

/// Foods available for feeding.
#[utoipa::path(
    get,
    path = "/api/v1/foods",
    responses(
        (status = 200, description = "Foods", body = [FoodBody]),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["catalog"],
    operation_id = "listFoods"
)]
#[get("/foods")]
pub async fn list_foods(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<FoodBody>>> {
    let foods = state.care_query.foods().await?;
    Ok(web::Json(foods.into_iter().map(FoodBody::from).collect()))
}

/// Activities available for play.
#[utoipa::path(
    get,
    path = "/api/v1/activities",
    responses(
        (status = 200, description = "Activities", body = [ActivityBody]),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["catalog"],
    operation_id = "listActivities"
)]
#[get("/activities")]
pub async fn list_activities(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<ActivityBody>>> {
    let activities = state.care_query.activities().await?;
    Ok(web::Json(
        activities.into_iter().map(ActivityBody::from).collect(),
    ))
}

/// Pet types accepted by `POST /pets`.
#[utoipa::path(
    get,
    path = "/api/v1/pet-types",
    responses(
        (status = 200, description = "Pet types", body = [PetTypeBody]),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["catalog"],
    operation_id = "listPetTypes"
)]
#[get("/pet-types")]
pub async fn list_pet_types(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<PetTypeBody>>> {
    let types = state.care_query.pet_types().await?;
    Ok(web::Json(types.into_iter().map(PetTypeBody::from).collect()))
}
