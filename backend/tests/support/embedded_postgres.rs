//! Embedded PostgreSQL provisioning.
//!
//! Migrations run once into a template database named after the hash of
//! `migrations/`; every test database is cloned from it.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use pet_backend::outbound::persistence::run_pending_migrations;
use pg_embedded_setup_unpriv::test_support::{hash_directory, shared_cluster_handle};
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use tokio::runtime::Runtime;
use uuid::Uuid;

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const TEMPLATE_NAME_PREFIX: &str = "pets_template";

fn template_database_name() -> Result<String, String> {
    let migrations = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let hash = hash_directory(migrations).map_err(|err| format!("hash migrations: {err}"))?;
    let short_hash = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_NAME_PREFIX}_{short_hash}"))
}

fn ensure_template_database(cluster: &ClusterHandle, runtime: &Runtime) -> Result<String, String> {
    let template_name = template_database_name()?;
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(template_name.as_str())
        .map_err(|err| format!("template check: {err:?}"))?;
    if !exists {
        cluster
            .create_database(template_name.as_str())
            .map_err(|err| format!("create template: {err:?}"))?;
        let url = cluster.connection().database_url(&template_name);
        runtime
            .block_on(run_pending_migrations(&url))
            .map_err(|err| err.to_string())?;
    }
    Ok(template_name)
}

/// Start (or reuse) the shared cluster and clone a fresh, migrated
/// database for one test.
pub fn provision_migrated_database(runtime: &Runtime) -> Result<TemporaryDatabase, String> {
    let cluster = shared_cluster_handle().map_err(|err| err.to_string())?;
    let template_name = ensure_template_database(cluster, runtime)?;
    let db_name = format!("test_{}", Uuid::new_v4().simple());
    cluster
        .temporary_database_from_template(db_name.as_str(), template_name.as_str())
        .map_err(|err| format!("create database from template: {err:?}"))
}
