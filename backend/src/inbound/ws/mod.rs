//! WebSocket inbound adapter pushing decay ticks to a logged-in client.
//!
//! Responsibilities:
//! - validate upgrade requests (`?userId=` must name a user)
//! - start one [`DecaySubscription`](crate::domain::DecaySubscription) per
//!   connection and cancel it when the socket closes
//! - keep WebSocket-specific concerns at the edge of the system

use actix_web::web::{self, Payload};
use actix_web::{HttpRequest, HttpResponse, get};
use serde::Deserialize;
use tracing::{error, info};

use crate::domain::{Error, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::validation::{parse_id, require};

mod session;

pub mod messages;
pub mod state;

/// Query string accepted by the `/ws` upgrade.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WsParams {
    pub user_id: Option<i64>,
}

/// Handle WebSocket upgrade for the `/ws` endpoint.
#[get("/ws")]
pub async fn ws_entry(
    state: web::Data<state::WsState>,
    params: web::Query<WsParams>,
    req: HttpRequest,
    stream: Payload,
) -> ApiResult<HttpResponse> {
    let raw = require(params.into_inner().user_id, "userId")?;
    let user_id = parse_id(raw, "userId", UserId::new)?;

    let (response, ws_session, messages) = actix_ws::handle(&req, stream).map_err(|error| {
        error!(error = %error, "WebSocket upgrade failed");
        Error::invalid_request("WebSocket upgrade failed")
    })?;

    let subscription = state.scheduler.start(user_id);
    info!(%user_id, "decay session opened");
    actix_web::rt::spawn(session::handle_ws_session(ws_session, messages, subscription));
    Ok(response)
}
