//! Backend entry-point: loads settings, prepares storage and serves the
//! REST, WebSocket and health endpoints.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use pet_backend::inbound::http::health::HealthState;
use pet_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use pet_backend::settings::AppSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let mut config = ServerConfig::from_settings(&settings);

    if let Some(database_url) = settings.database_url() {
        run_pending_migrations(database_url)
            .await
            .map_err(std::io::Error::other)?;
        let pool_config = PoolConfig::new(database_url)
            .with_max_size(settings.db_max_connections())
            .with_connection_timeout(settings.storage_timeout());
        let pool = DbPool::new(pool_config)
            .await
            .map_err(std::io::Error::other)?;
        config = config.with_db_pool(pool);
    }

    info!(bind_addr = %config.bind_addr(), "starting pet backend");
    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
