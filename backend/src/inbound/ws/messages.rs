//! Wire-level message definitions for the WebSocket adapter.
//!
//! Decay outcomes are transformed into these payloads before being
//! serialised to JSON and pushed to the connected client.

use serde::Serialize;

use crate::domain::ports::DecayResponse;
use crate::inbound::http::pets::PetResponse;

/// Outbound payload pushed after every decay tick.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecayUpdate {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_pet: Option<PetResponse>,
}

impl From<DecayResponse> for DecayUpdate {
    fn from(value: DecayResponse) -> Self {
        Self {
            message: value.message,
            updated_pet: value.updated_pet.map(PetResponse::from),
        }
    }
}
