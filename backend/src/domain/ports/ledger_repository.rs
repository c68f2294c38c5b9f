//! Port for the append-only feeding and activity ledger.

use async_trait::async_trait;

use crate::domain::{HistoryQuery, HistoryRecord, LedgerEntry, NewLedgerEntry};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ledger adapters.
    pub enum LedgerRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "ledger connection failed: {message}",
        /// Query or insert failed during execution.
        Query { message: String } =>
            "ledger query failed: {message}",
    }
}

/// Port for appending ledger entries and reading history.
///
/// A recorded entry is visible to every later `history` call. Entries are
/// never updated or removed, including when their pet is deleted.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Append one entry.
    async fn record(&self, entry: &NewLedgerEntry) -> Result<LedgerEntry, LedgerRepositoryError>;

    /// History rows for live pets, newest first, truncated to the query's
    /// limit when one is given.
    async fn history(
        &self,
        query: &HistoryQuery,
    ) -> Result<Vec<HistoryRecord>, LedgerRepositoryError>;
}
