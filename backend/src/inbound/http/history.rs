//! Ledger history HTTP handlers.
//!
//! ```text
//! GET /api/v1/pets/{petId}/feeding-log?limit=10
//! GET /api/v1/pets/{petId}/activity-log?limit=10
//! GET /api/v1/users/{userId}/food-log?limit=10
//! GET /api/v1/users/{userId}/activities-log?limit=10
//! ```

use actix_web::{get, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Error, HistoryKind, HistoryQuery, HistoryRecord, HistoryScope, PetId, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_id, parse_limit};

/// `?limit=` kept as raw text so malformed values produce a domain error.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryParams {
    /// Maximum number of entries, 1 to 100.
    #[param(value_type = Option<u32>)]
    pub limit: Option<String>,
}

/// One history row, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntryBody {
    #[schema(example = "Rex")]
    pub pet_name: String,
    #[schema(example = "Kibble")]
    pub item_name: String,
    pub timestamp: DateTime<Utc>,
}

impl From<HistoryRecord> for HistoryEntryBody {
    fn from(record: HistoryRecord) -> Self {
        Self {
            pet_name: record.pet_name,
            item_name: record.item_name,
            timestamp: record.recorded_at,
        }
    }
}

async fn load(
    state: &HttpState,
    scope: HistoryScope,
    kind: HistoryKind,
    params: &HistoryParams,
) -> ApiResult<web::Json<Vec<HistoryEntryBody>>> {
    let limit = parse_limit(params.limit.as_deref(), state.history_limit)?;
    let records = state
        .care_query
        .history(HistoryQuery {
            scope,
            kind,
            limit: Some(limit),
        })
        .await?;
    Ok(web::Json(
        records.into_iter().map(HistoryEntryBody::from).collect(),
    ))
}

fn pet_scope(raw: i64) -> Result<HistoryScope, Error> {
    parse_id(raw, "petId", PetId::new).map(HistoryScope::Pet)
}

fn user_scope(raw: i64) -> Result<HistoryScope, Error> {
    parse_id(raw, "userId", UserId::new).map(HistoryScope::User)
}

/// Feeding history of one pet.
#[utoipa::path(
    get,
    path = "/api/v1/pets/{petId}/feeding-log",
    params(("petId" = i64, Path, description = "Pet identifier"), HistoryParams),
    responses(
        (status = 200, description = "Feeding entries", body = [HistoryEntryBody]),
        (status = 400, description = "Invalid id or limit", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["history"],
    operation_id = "petFeedingLog"
)]
#[get("/pets/{pet_id}/feeding-log")]
pub async fn pet_feeding_log(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    params: web::Query<HistoryParams>,
) -> ApiResult<web::Json<Vec<HistoryEntryBody>>> {
    let scope = pet_scope(path.into_inner())?;
    load(&state, scope, HistoryKind::Food, &params).await
}

/// Activity history of one pet.
#[utoipa::path(
    get,
    path = "/api/v1/pets/{petId}/activity-log",
    params(("petId" = i64, Path, description = "Pet identifier"), HistoryParams),
    responses(
        (status = 200, description = "Activity entries", body = [HistoryEntryBody]),
        (status = 400, description = "Invalid id or limit", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["history"],
    operation_id = "petActivityLog"
)]
#[get("/pets/{pet_id}/activity-log")]
pub async fn pet_activity_log(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    params: web::Query<HistoryParams>,
) -> ApiResult<web::Json<Vec<HistoryEntryBody>>> {
    let scope = pet_scope(path.into_inner())?;
    load(&state, scope, HistoryKind::Activity, &params).await
}

/// Feeding history across every pet of a user.
#[utoipa::path(
    get,
    path = "/api/v1/users/{userId}/food-log",
    params(("userId" = i64, Path, description = "Owner identifier"), HistoryParams),
    responses(
        (status = 200, description = "Feeding entries", body = [HistoryEntryBody]),
        (status = 400, description = "Invalid id or limit", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["history"],
    operation_id = "userFoodLog"
)]
#[get("/users/{user_id}/food-log")]
pub async fn user_food_log(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    params: web::Query<HistoryParams>,
) -> ApiResult<web::Json<Vec<HistoryEntryBody>>> {
    let scope = user_scope(path.into_inner())?;
    load(&state, scope, HistoryKind::Food, &params).await
}

/// Activity history across every pet of a user.
#[utoipa::path(
    get,
    path = "/api/v1/users/{userId}/activities-log",
    params(("userId" = i64, Path, description = "Owner identifier"), HistoryParams),
    responses(
        (status = 200, description = "Activity entries", body = [HistoryEntryBody]),
        (status = 400, description = "Invalid id or limit", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["history"],
    operation_id = "userActivitiesLog"
)]
#[get("/users/{user_id}/activities-log")]
pub async fn user_activities_log(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    params: web::Query<HistoryParams>,
) -> ApiResult<web::Json<Vec<HistoryEntryBody>>> {
    let scope = user_scope(path.into_inner())?;
    load(&state, scope, HistoryKind::Activity, &params).await
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
