//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only
//! depend on driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{PetCareCommand, PetCareQuery, PetRegistry};

/// Driving ports used by the HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub care: Arc<dyn PetCareCommand>,
    pub care_query: Arc<dyn PetCareQuery>,
    pub registry: Arc<dyn PetRegistry>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub care: Arc<dyn PetCareCommand>,
    pub care_query: Arc<dyn PetCareQuery>,
    pub registry: Arc<dyn PetRegistry>,
    /// Entries returned by history endpoints when `?limit=` is absent.
    pub history_limit: usize,
}

impl HttpState {
    /// Construct state from the ports bundle.
    pub fn new(ports: HttpStatePorts, history_limit: usize) -> Self {
        let HttpStatePorts {
            care,
            care_query,
            registry,
        } = ports;
        Self {
            care,
            care_query,
            registry,
            history_limit: history_limit.max(1),
        }
    }
}
