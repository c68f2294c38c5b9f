//! Shared helpers for the Diesel adapter integration suites.
//!
//! Each suite compiles as its own crate, so the embedded cluster handling
//! and row-level helpers live here instead of being copied per file.

pub mod cluster_skip;
pub mod embedded_postgres;

pub use cluster_skip::handle_cluster_setup_failure;
pub use embedded_postgres::provision_migrated_database;

/// Render a `postgres` error with the SQLSTATE and server message.
///
/// The plain `Display` output collapses database errors to `db error`.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };

    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    summary
}
