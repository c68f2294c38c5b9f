//! Pet care and pet registry HTTP handlers.
//!
//! ```text
//! POST   /api/v1/pets/{petId}/feed        {"food_id": 1}
//! POST   /api/v1/pets/{petId}/play        {"activity_id": 1}
//! POST   /api/v1/pets/decrease-hunger     {"userId": 1}
//! GET    /api/v1/pets/{petId}/status
//! POST   /api/v1/pets                     {"user_id", "pet_name", "pet_type_id", "age"}
//! GET    /api/v1/users/{userId}/pets
//! DELETE /api/v1/pets/{petId}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{
    AddPetRequest, DecayRequest, DecayResponse, FeedRequest, PetPayload, PetStatus, PlayRequest,
};
use crate::domain::{ActivityId, Error, FoodId, PetTypeId, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_id, parse_pet_path_id, require};

/// Pet snapshot returned by mutation and listing endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PetResponse {
    pub pet_id: i64,
    pub user_id: i64,
    pub pet_name: String,
    pub pet_type_id: i64,
    pub type_name: String,
    pub age: u32,
    pub hunger_level: u8,
    pub happiness_level: u8,
}

impl From<PetPayload> for PetResponse {
    fn from(pet: PetPayload) -> Self {
        Self {
            pet_id: pet.pet_id.get(),
            user_id: pet.user_id.get(),
            pet_name: pet.pet_name,
            pet_type_id: pet.pet_type_id,
            type_name: pet.type_name,
            age: pet.age,
            hunger_level: pet.hunger_level,
            happiness_level: pet.happiness_level,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct FeedBody {
    pub food_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FeedResponseBody {
    #[schema(example = "Pet has been fed with Kibble! (+20 hunger)")]
    pub message: String,
    pub nutrition_gained: u32,
    pub pet: PetResponse,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PlayBody {
    pub activity_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlayResponseBody {
    #[schema(example = "You played Fetch with the pet! (+15 happiness)")]
    pub message: String,
    pub happiness_gained: u32,
    pub pet: PetResponse,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecayBody {
    pub user_id: Option<i64>,
}

/// Decay outcome; also pushed over the session WebSocket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecayResponseBody {
    #[schema(example = "Decreased hunger for 1 pet (-10)")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_pet: Option<PetResponse>,
}

impl From<DecayResponse> for DecayResponseBody {
    fn from(response: DecayResponse) -> Self {
        Self {
            message: response.message,
            updated_pet: response.updated_pet.map(PetResponse::from),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PetStatusBody {
    pub pet_id: i64,
    pub pet_name: String,
    pub pet_type: String,
    pub age: u32,
    pub happiness_level: u8,
    pub hunger_level: u8,
}

impl From<PetStatus> for PetStatusBody {
    fn from(status: PetStatus) -> Self {
        Self {
            pet_id: status.pet_id.get(),
            pet_name: status.pet_name,
            pet_type: status.pet_type,
            age: status.age,
            happiness_level: status.happiness_level,
            hunger_level: status.hunger_level,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AddPetBody {
    pub user_id: Option<i64>,
    pub pet_name: Option<String>,
    pub pet_type_id: Option<i64>,
    pub age: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddPetResponseBody {
    #[schema(example = "Pet added")]
    pub message: String,
    pub pet_id: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageBody {
    pub message: String,
}

fn parse_add_pet(body: AddPetBody) -> Result<AddPetRequest, Error> {
    let user_id = require(body.user_id, "user_id")?;
    let pet_name = require(body.pet_name, "pet_name")?;
    let pet_type_id = require(body.pet_type_id, "pet_type_id")?;
    let age = require(body.age, "age")?;
    Ok(AddPetRequest {
        user_id: parse_id(user_id, "user_id", UserId::new)?,
        pet_name,
        pet_type_id: parse_id(pet_type_id, "pet_type_id", PetTypeId::new)?,
        age,
    })
}

/// Feed a pet with a catalog food.
#[utoipa::path(
    post,
    path = "/api/v1/pets/{petId}/feed",
    params(("petId" = i64, Path, description = "Pet identifier")),
    request_body = FeedBody,
    responses(
        (status = 200, description = "Pet fed", body = FeedResponseBody),
        (status = 400, description = "Missing or unknown food", body = Error),
        (status = 404, description = "Pet not found", body = Error),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["pets"],
    operation_id = "feedPet"
)]
#[post("/pets/{pet_id}/feed")]
pub async fn feed_pet(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<FeedBody>,
) -> ApiResult<web::Json<FeedResponseBody>> {
    let pet_id = parse_pet_path_id(path.into_inner())?;
    let food_id = require(payload.into_inner().food_id, "food_id")?;
    let food_id = parse_id(food_id, "food_id", FoodId::new)?;
    let response = state.care.feed(FeedRequest { pet_id, food_id }).await?;
    Ok(web::Json(FeedResponseBody {
        message: response.message,
        nutrition_gained: response.nutrition_gained,
        pet: response.pet.into(),
    }))
}

/// Play a catalog activity with a pet.
#[utoipa::path(
    post,
    path = "/api/v1/pets/{petId}/play",
    params(("petId" = i64, Path, description = "Pet identifier")),
    request_body = PlayBody,
    responses(
        (status = 200, description = "Played with pet", body = PlayResponseBody),
        (status = 400, description = "Missing or unknown activity", body = Error),
        (status = 404, description = "Pet not found", body = Error),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["pets"],
    operation_id = "playWithPet"
)]
#[post("/pets/{pet_id}/play")]
pub async fn play_with_pet(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<PlayBody>,
) -> ApiResult<web::Json<PlayResponseBody>> {
    let pet_id = parse_pet_path_id(path.into_inner())?;
    let activity_id = require(payload.into_inner().activity_id, "activity_id")?;
    let activity_id = parse_id(activity_id, "activity_id", ActivityId::new)?;
    let response = state
        .care
        .play(PlayRequest {
            pet_id,
            activity_id,
        })
        .await?;
    Ok(web::Json(PlayResponseBody {
        message: response.message,
        happiness_gained: response.happiness_gained,
        pet: response.pet.into(),
    }))
}

/// Run one decay tick for a user outside a WebSocket session.
#[utoipa::path(
    post,
    path = "/api/v1/pets/decrease-hunger",
    request_body = DecayBody,
    responses(
        (status = 200, description = "Decay applied or no pets", body = DecayResponseBody),
        (status = 400, description = "Missing userId", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["pets"],
    operation_id = "decreaseHunger"
)]
#[post("/pets/decrease-hunger")]
pub async fn decrease_hunger(
    state: web::Data<HttpState>,
    payload: web::Json<DecayBody>,
) -> ApiResult<web::Json<DecayResponseBody>> {
    let user_id = require(payload.into_inner().user_id, "userId")?;
    let user_id = parse_id(user_id, "userId", UserId::new)?;
    let response = state.care.decay(DecayRequest { user_id }).await?;
    Ok(web::Json(response.into()))
}

/// Current statistics of one pet.
#[utoipa::path(
    get,
    path = "/api/v1/pets/{petId}/status",
    params(("petId" = i64, Path, description = "Pet identifier")),
    responses(
        (status = 200, description = "Pet status", body = PetStatusBody),
        (status = 404, description = "Pet not found", body = Error)
    ),
    tags = ["pets"],
    operation_id = "getPetStatus"
)]
#[get("/pets/{pet_id}/status")]
pub async fn pet_status(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<PetStatusBody>> {
    let pet_id = parse_pet_path_id(path.into_inner())?;
    let status = state.care_query.status(pet_id).await?;
    Ok(web::Json(status.into()))
}

/// Register a pet at default statistics.
#[utoipa::path(
    post,
    path = "/api/v1/pets",
    request_body = AddPetBody,
    responses(
        (status = 201, description = "Pet added", body = AddPetResponseBody),
        (status = 400, description = "Invalid pet", body = Error)
    ),
    tags = ["pets"],
    operation_id = "addPet"
)]
#[post("/pets")]
pub async fn add_pet(
    state: web::Data<HttpState>,
    payload: web::Json<AddPetBody>,
) -> ApiResult<HttpResponse> {
    let request = parse_add_pet(payload.into_inner())?;
    let pet = state.registry.add_pet(request).await?;
    Ok(HttpResponse::Created().json(AddPetResponseBody {
        message: "Pet added".to_owned(),
        pet_id: pet.pet_id.get(),
    }))
}

/// Every pet owned by a user.
#[utoipa::path(
    get,
    path = "/api/v1/users/{userId}/pets",
    params(("userId" = i64, Path, description = "Owner identifier")),
    responses(
        (status = 200, description = "Pets", body = [PetResponse]),
        (status = 400, description = "Invalid user id", body = Error)
    ),
    tags = ["pets"],
    operation_id = "listPets"
)]
#[get("/users/{user_id}/pets")]
pub async fn list_pets(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Vec<PetResponse>>> {
    let user_id = parse_id(path.into_inner(), "userId", UserId::new)?;
    let pets = state.registry.list_pets(user_id).await?;
    Ok(web::Json(pets.into_iter().map(PetResponse::from).collect()))
}

/// Hard-delete a pet. Its ledger history is retained in storage.
#[utoipa::path(
    delete,
    path = "/api/v1/pets/{petId}",
    params(("petId" = i64, Path, description = "Pet identifier")),
    responses(
        (status = 200, description = "Pet deleted", body = MessageBody),
        (status = 404, description = "Pet not found", body = Error)
    ),
    tags = ["pets"],
    operation_id = "deletePet"
)]
#[delete("/pets/{pet_id}")]
pub async fn delete_pet(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<MessageBody>> {
    let pet_id = parse_pet_path_id(path.into_inner())?;
    state.registry.delete_pet(pet_id).await?;
    Ok(web::Json(MessageBody {
        message: "Pet deleted successfully".to_owned(),
    }))
}

#[cfg(test)]
#[path = "pets_tests.rs"]
mod tests;
