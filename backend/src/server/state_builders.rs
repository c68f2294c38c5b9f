//! Builders wiring driven adapters into the HTTP and WebSocket state.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::info;

use pet_backend::domain::ports::{ActionCatalog, LedgerRepository, PetRepository};
use pet_backend::domain::{DecayScheduler, PetCarePorts, PetCareService, PetRegistryService};
use pet_backend::inbound::http::state::{HttpState, HttpStatePorts};
use pet_backend::inbound::ws::state::WsState;
use pet_backend::outbound::memory::{CatalogSeed, InMemoryPetStore};
use pet_backend::outbound::persistence::{
    DbPool, DieselActionCatalog, DieselLedgerRepository, DieselPetRepository,
};

use super::ServerConfig;

/// Driven ports selected for this process.
struct DrivenPorts {
    pets: Arc<dyn PetRepository>,
    ledger: Arc<dyn LedgerRepository>,
    catalog: Arc<dyn ActionCatalog>,
}

impl DrivenPorts {
    fn diesel(pool: &DbPool) -> Self {
        Self {
            pets: Arc::new(DieselPetRepository::new(pool.clone())),
            ledger: Arc::new(DieselLedgerRepository::new(pool.clone())),
            catalog: Arc::new(DieselActionCatalog::new(pool.clone())),
        }
    }

    fn in_memory() -> std::io::Result<Self> {
        let seed = CatalogSeed::demo()
            .map_err(|e| std::io::Error::other(format!("demo catalog is invalid: {e}")))?;
        let store = Arc::new(InMemoryPetStore::new(seed));
        Ok(Self {
            pets: store.clone(),
            ledger: store.clone(),
            catalog: store,
        })
    }
}

/// Adapter state shared by every worker.
#[derive(Clone)]
pub(super) struct AppStates {
    pub(super) http: web::Data<HttpState>,
    pub(super) ws: web::Data<WsState>,
}

/// Build adapter state from Diesel adapters when a pool is configured,
/// otherwise from the in-memory demo store.
///
/// # Errors
/// Returns [`std::io::Error`] if the demo catalog cannot be constructed.
pub(super) fn build_states(config: &ServerConfig) -> std::io::Result<AppStates> {
    let ports = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL storage");
            DrivenPorts::diesel(pool)
        }
        None => {
            info!("no database configured; using in-memory demo store");
            DrivenPorts::in_memory()?
        }
    };
    let DrivenPorts {
        pets,
        ledger,
        catalog,
    } = ports;

    let care = Arc::new(PetCareService::new(
        PetCarePorts::new(Arc::clone(&pets), ledger, Arc::clone(&catalog)),
        Arc::new(DefaultClock),
        config.pet_care,
    ));
    let registry = Arc::new(PetRegistryService::new(
        pets,
        catalog,
        care.locks(),
        config.pet_care.storage_timeout,
    ));
    let scheduler = DecayScheduler::new(care.clone(), config.decay);

    let http = HttpState::new(
        HttpStatePorts {
            care: care.clone(),
            care_query: care,
            registry,
        },
        config.history_limit,
    );
    Ok(AppStates {
        http: web::Data::new(http),
        ws: web::Data::new(WsState::new(scheduler)),
    })
}
