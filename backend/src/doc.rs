//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint from the inbound layer together
//! with the shared error schema. The generated document is served by
//! Swagger UI in debug builds.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::catalog::{ActivityBody, FoodBody, PetTypeBody};
use crate::inbound::http::history::HistoryEntryBody;
use crate::inbound::http::pets::{
    AddPetBody, AddPetResponseBody, DecayBody, DecayResponseBody, FeedBody, FeedResponseBody,
    MessageBody, PetResponse, PetStatusBody, PlayBody, PlayResponseBody,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pet backend API",
        description = "Feed, play with and track the vital statistics of virtual pets."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::pets::feed_pet,
        crate::inbound::http::pets::play_with_pet,
        crate::inbound::http::pets::decrease_hunger,
        crate::inbound::http::pets::pet_status,
        crate::inbound::http::pets::add_pet,
        crate::inbound::http::pets::list_pets,
        crate::inbound::http::pets::delete_pet,
        crate::inbound::http::history::pet_feeding_log,
        crate::inbound::http::history::pet_activity_log,
        crate::inbound::http::history::user_food_log,
        crate::inbound::http::history::user_activities_log,
        crate::inbound::http::catalog::list_foods,
        crate::inbound::http::catalog::list_activities,
        crate::inbound::http::catalog::list_pet_types,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        PetResponse,
        FeedBody,
        FeedResponseBody,
        PlayBody,
        PlayResponseBody,
        DecayBody,
        DecayResponseBody,
        PetStatusBody,
        AddPetBody,
        AddPetResponseBody,
        MessageBody,
        HistoryEntryBody,
        FoodBody,
        ActivityBody,
        PetTypeBody,
    )),
    tags(
        (name = "pets", description = "Pet care actions and the pet registry"),
        (name = "history", description = "Feeding and activity ledgers"),
        (name = "catalog", description = "Foods, activities and pet types"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
