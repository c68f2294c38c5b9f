//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use pet_backend::domain::{DecaySchedulerConfig, PetCareConfig};
use pet_backend::outbound::persistence::DbPool;
use pet_backend::settings::AppSettings;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) pet_care: PetCareConfig,
    pub(crate) decay: DecaySchedulerConfig,
    pub(crate) history_limit: usize,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration from loaded settings. Storage
    /// defaults to the in-memory demo store until a pool is attached.
    #[must_use]
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self {
            bind_addr: settings.bind_addr(),
            pet_care: settings.pet_care_config(),
            decay: settings.decay_scheduler_config(),
            history_limit: settings.history_limit(),
            db_pool: None,
        }
    }

    /// Attach a database connection pool; the Diesel adapters replace the
    /// in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
