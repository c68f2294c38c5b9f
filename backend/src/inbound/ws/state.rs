//! Shared WebSocket adapter state.

use crate::domain::DecayScheduler;

/// Dependency bundle for the WebSocket entry point.
#[derive(Clone)]
pub struct WsState {
    pub scheduler: DecayScheduler,
}

impl WsState {
    pub fn new(scheduler: DecayScheduler) -> Self {
        Self { scheduler }
    }
}
