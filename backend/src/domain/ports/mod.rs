//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`PetRepository`, `LedgerRepository`, `ActionCatalog`) are
//! implemented by outbound adapters. Driving ports (`PetCareCommand`,
//! `PetCareQuery`, `PetRegistry`) are implemented by domain services and
//! consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod action_catalog;
mod ledger_repository;
mod pet_care_command;
mod pet_care_query;
mod pet_registry;
mod pet_repository;

#[cfg(test)]
pub use action_catalog::MockActionCatalog;
pub use action_catalog::{ActionCatalog, ActionCatalogError};
#[cfg(test)]
pub use ledger_repository::MockLedgerRepository;
pub use ledger_repository::{LedgerRepository, LedgerRepositoryError};
#[cfg(test)]
pub use pet_care_command::MockPetCareCommand;
pub use pet_care_command::{
    DecayRequest, DecayResponse, FeedRequest, FeedResponse, PetCareCommand, PetPayload,
    PlayRequest, PlayResponse,
};
#[cfg(test)]
pub use pet_care_query::MockPetCareQuery;
pub use pet_care_query::{PetCareQuery, PetStatus};
#[cfg(test)]
pub use pet_registry::MockPetRegistry;
pub use pet_registry::{AddPetRequest, PetRegistry};
#[cfg(test)]
pub use pet_repository::MockPetRepository;
pub use pet_repository::{AtomicActionOutcome, PetRepository, PetRepositoryError};
