//! Append-only record of feeding and play events.
//!
//! One entry is written per successful feed or play. Decay never writes an
//! entry. History is always read newest first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ActivityId, FoodId, LedgerEntryId, PetId, UserId};

/// What happened to the pet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "item_id")]
pub enum LedgerAction {
    Fed(FoodId),
    Played(ActivityId),
}

impl LedgerAction {
    #[must_use]
    pub const fn history_kind(self) -> HistoryKind {
        match self {
            Self::Fed(_) => HistoryKind::Food,
            Self::Played(_) => HistoryKind::Activity,
        }
    }
}

/// Ledger entry before storage assigns it an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLedgerEntry {
    pub pet_id: PetId,
    pub action: LedgerAction,
    pub recorded_at: DateTime<Utc>,
}

/// Persisted ledger entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub id: LedgerEntryId,
    pub pet_id: PetId,
    pub action: LedgerAction,
    pub recorded_at: DateTime<Utc>,
}

impl LedgerEntry {
    #[must_use]
    pub fn from_new(id: LedgerEntryId, entry: &NewLedgerEntry) -> Self {
        Self {
            id,
            pet_id: entry.pet_id,
            action: entry.action,
            recorded_at: entry.recorded_at,
        }
    }
}

/// Whose history is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryScope {
    Pet(PetId),
    User(UserId),
}

/// Which half of the ledger is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryKind {
    Food,
    Activity,
}

/// History lookup parameters.
///
/// `limit: None` returns every entry; callers that page the UI pass their
/// own limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub scope: HistoryScope,
    pub kind: HistoryKind,
    pub limit: Option<usize>,
}

/// One history row joined with the pet and catalog names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub entry_id: LedgerEntryId,
    pub pet_id: PetId,
    pub pet_name: String,
    pub item_name: String,
    pub recorded_at: DateTime<Utc>,
}

/// Newest-first ordering used by every history reader: timestamp
/// descending, entry id descending on ties.
pub fn sort_newest_first(records: &mut [HistoryRecord]) {
    records.sort_by(|a, b| {
        b.recorded_at
            .cmp(&a.recorded_at)
            .then_with(|| b.entry_id.cmp(&a.entry_id))
    });
}
