//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the pet, ledger and catalog ports backed by
//! PostgreSQL through `diesel-async` with `bb8` pooling.
//!
//! - Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//!   private to this module.
//! - Adapters only translate between rows and domain values. Statistic
//!   arithmetic and clamping happen in SQL so concurrent writers serialise
//!   on the row.
//! - Database failures map to the port's `Connection`/`Query` variants.
//!
//! # Example
//!
//! ```ignore
//! use pet_backend::outbound::persistence::{DbPool, DieselPetRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/pets")).await?;
//! let pets = DieselPetRepository::new(pool);
//! ```

mod diesel_action_catalog;
mod diesel_basic_error_mapping;
mod diesel_ledger_repository;
mod diesel_pet_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_action_catalog::DieselActionCatalog;
pub use diesel_ledger_repository::DieselLedgerRepository;
pub use diesel_pet_repository::DieselPetRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
