//! Domain primitives, aggregates and services.
//!
//! Public surface:
//! - `VitalStat`, `StatKind`, `StatAdjustment`: bounded statistics.
//! - `Pet`, `NewPet`, `Food`, `Activity` and the ledger types.
//! - `PetCareService`: the stats engine (feed, play, decay, status,
//!   history).
//! - `PetRegistryService`: add, list and delete pets.
//! - `DecayScheduler`: per-session recurring decay.
//! - `Error`/`ErrorCode`: transport-agnostic failures.

pub mod catalog;
pub mod decay_scheduler;
pub mod error;
pub mod ids;
pub mod ledger;
pub mod pet;
pub mod pet_care;
pub mod pet_registry_service;
pub mod ports;
pub mod trace_id;
pub mod vital_stat;

pub use self::catalog::{Activity, Food};
pub use self::decay_scheduler::{DecayScheduler, DecaySchedulerConfig, DecaySubscription};
pub use self::error::{Error, ErrorCode};
pub use self::ids::{
    ActivityId, FoodId, IdValidationError, LedgerEntryId, PetId, PetTypeId, UserId,
};
pub use self::ledger::{
    HistoryKind, HistoryQuery, HistoryRecord, HistoryScope, LedgerAction, LedgerEntry,
    NewLedgerEntry, sort_newest_first,
};
pub use self::pet::{NewPet, PET_NAME_MAX_CHARS, Pet, PetDraft, PetType, PetValidationError};
pub use self::pet_care::{
    DECAY_AMOUNT, DecayTargetPicker, PetCareConfig, PetCareError, PetCarePorts, PetCareRuntime,
    PetCareService, PetGuard, PetLocks, UniformDecayTarget,
};
pub use self::pet_registry_service::PetRegistryService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::vital_stat::{StatAdjustment, StatKind, VitalStat, VitalStatRangeError};
