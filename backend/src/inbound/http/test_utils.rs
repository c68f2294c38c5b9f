//! Test helpers for inbound HTTP components.

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use mockable::DefaultClock;

use crate::domain::ports::{
    MockPetCareCommand, MockPetCareQuery, MockPetRegistry, PetCareCommand, PetCareQuery,
    PetRegistry,
};
use crate::domain::{PetCareConfig, PetCarePorts, PetCareService, PetRegistryService};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::{CatalogSeed, InMemoryPetStore};

pub(crate) const TEST_HISTORY_LIMIT: usize = 10;

fn build(
    care: Arc<dyn PetCareCommand>,
    care_query: Arc<dyn PetCareQuery>,
    registry: Arc<dyn PetRegistry>,
) -> web::Data<HttpState> {
    web::Data::new(HttpState::new(
        HttpStatePorts {
            care,
            care_query,
            registry,
        },
        TEST_HISTORY_LIMIT,
    ))
}

/// State whose command port is `care`; other ports expect no calls.
pub(crate) fn state_with_command(care: MockPetCareCommand) -> web::Data<HttpState> {
    build(
        Arc::new(care),
        Arc::new(MockPetCareQuery::new()),
        Arc::new(MockPetRegistry::new()),
    )
}

/// State whose query port is `query`; other ports expect no calls.
pub(crate) fn state_with_query(query: MockPetCareQuery) -> web::Data<HttpState> {
    build(
        Arc::new(MockPetCareCommand::new()),
        Arc::new(query),
        Arc::new(MockPetRegistry::new()),
    )
}

/// State whose registry port is `registry`; other ports expect no calls.
pub(crate) fn state_with_registry(registry: MockPetRegistry) -> web::Data<HttpState> {
    build(
        Arc::new(MockPetCareCommand::new()),
        Arc::new(MockPetCareQuery::new()),
        Arc::new(registry),
    )
}

/// State wired to the real services over an in-memory store holding the
/// demo catalog.
pub(crate) fn in_memory_state() -> (web::Data<HttpState>, Arc<InMemoryPetStore>) {
    let store = Arc::new(InMemoryPetStore::new(
        CatalogSeed::demo().expect("demo catalog ids are valid"),
    ));
    let config = PetCareConfig {
        storage_timeout: Duration::from_secs(1),
    };
    let care = Arc::new(PetCareService::new(
        PetCarePorts::new(store.clone(), store.clone(), store.clone()),
        Arc::new(DefaultClock),
        config,
    ));
    let registry = Arc::new(PetRegistryService::new(
        store.clone(),
        store.clone(),
        care.locks(),
        config.storage_timeout,
    ));
    (build(care.clone(), care, registry), store)
}
