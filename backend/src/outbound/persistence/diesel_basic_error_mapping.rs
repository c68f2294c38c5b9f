//! Diesel and pool failure mapping shared by the pet, ledger and catalog
//! adapters.
//!
//! Each port error exposes `connection` and `query` constructors; these
//! helpers pick one so every adapter classifies failures the same way.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// A pool failure always means storage could not be reached.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Classify a Diesel error as a connection or query failure.
///
/// Closed connections and serialization conflicts are reported as
/// connection failures so the engine surfaces them as "storage
/// unavailable"; everything else is a query failure.
pub fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "pet storage query failed");
        }
        other => debug!(error = %other, "pet storage query failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, _) => {
            connection("database serialization conflict")
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            query("stat constraint violated")
        }
        _ => query("database error"),
    }
}
