//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `PETS_*` environment variables or a config
//! file. Every scalar has a default, so the binary runs against the
//! in-memory store with no configuration at all.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{DecaySchedulerConfig, PetCareConfig};

const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 3000));
const DECAY_UPDATE_BUFFER: usize = 8;

/// Runtime configuration for the pet backend.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PETS")]
pub struct AppSettings {
    /// Socket address to listen on.
    #[ortho_config(default = DEFAULT_BIND_ADDR)]
    pub bind_addr: SocketAddr,
    /// PostgreSQL URL. When absent the in-memory demo store is used.
    pub database_url: Option<String>,
    /// Seconds between decay ticks for each connected session.
    #[ortho_config(default = 60)]
    pub decay_interval_secs: u64,
    /// Upper bound in milliseconds on any single storage call.
    #[ortho_config(default = 5_000)]
    pub storage_timeout_ms: u64,
    /// History entries returned when a request omits `limit`.
    #[ortho_config(default = 10)]
    pub history_limit: usize,
    /// Maximum pooled database connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
}

impl AppSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn decay_interval(&self) -> Duration {
        Duration::from_secs(self.decay_interval_secs.max(1))
    }

    pub fn storage_timeout(&self) -> Duration {
        Duration::from_millis(self.storage_timeout_ms.max(1))
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit.max(1)
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.max(1)
    }

    /// Engine tunables derived from these settings.
    pub fn pet_care_config(&self) -> PetCareConfig {
        PetCareConfig {
            storage_timeout: self.storage_timeout(),
        }
    }

    /// Scheduler tunables derived from these settings.
    pub fn decay_scheduler_config(&self) -> DecaySchedulerConfig {
        DecaySchedulerConfig {
            interval: self.decay_interval(),
            buffer: DECAY_UPDATE_BUFFER,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    const VARS: [&str; 6] = [
        "PETS_BIND_ADDR",
        "PETS_DATABASE_URL",
        "PETS_DECAY_INTERVAL_SECS",
        "PETS_STORAGE_TIMEOUT_MS",
        "PETS_HISTORY_LIMIT",
        "PETS_DB_MAX_CONNECTIONS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("pet-backend")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), "0.0.0.0:3000".parse().expect("addr"));
        assert_eq!(settings.database_url(), None);
        assert_eq!(settings.decay_interval(), Duration::from_secs(60));
        assert_eq!(settings.storage_timeout(), Duration::from_secs(5));
        assert_eq!(settings.history_limit(), 10);
        assert_eq!(settings.db_max_connections(), 10);
    }

    #[rstest]
    fn loads_without_any_configuration() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let loaded = AppSettings::load_from_iter([OsString::from("pet-backend")]);
        assert!(loaded.is_ok(), "zero-config load failed: {loaded:?}");
    }

    #[rstest]
    fn cli_flags_override_defaults() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = AppSettings::load_from_iter([
            OsString::from("pet-backend"),
            OsString::from("--history-limit"),
            OsString::from("20"),
        ])
        .expect("config should load");
        assert_eq!(settings.history_limit(), 20);
        assert_eq!(settings.decay_interval(), Duration::from_secs(60));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("PETS_BIND_ADDR", Some("127.0.0.1:8080".to_owned())),
            (
                "PETS_DATABASE_URL",
                Some("postgres://pets@localhost/pets".to_owned()),
            ),
            ("PETS_DECAY_INTERVAL_SECS", Some("5".to_owned())),
            ("PETS_STORAGE_TIMEOUT_MS", Some("250".to_owned())),
            ("PETS_HISTORY_LIMIT", Some("25".to_owned())),
            ("PETS_DB_MAX_CONNECTIONS", Some("4".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), "127.0.0.1:8080".parse().expect("addr"));
        assert_eq!(
            settings.database_url(),
            Some("postgres://pets@localhost/pets")
        );
        assert_eq!(settings.decay_scheduler_config().interval, Duration::from_secs(5));
        assert_eq!(
            settings.pet_care_config().storage_timeout,
            Duration::from_millis(250)
        );
        assert_eq!(settings.history_limit(), 25);
        assert_eq!(settings.db_max_connections(), 4);
    }

    #[rstest]
    fn blank_database_url_selects_the_memory_store() {
        let mut guard_vars = VARS.map(|name| (name, None::<String>));
        guard_vars[1] = ("PETS_DATABASE_URL", Some("   ".to_owned()));
        let _guard = lock_env(guard_vars);

        assert_eq!(load_from_empty_args().database_url(), None);
    }

    #[rstest]
    fn zero_values_are_raised_to_one() {
        let _guard = lock_env([
            ("PETS_BIND_ADDR", None),
            ("PETS_DATABASE_URL", None),
            ("PETS_DECAY_INTERVAL_SECS", Some("0".to_owned())),
            ("PETS_STORAGE_TIMEOUT_MS", Some("0".to_owned())),
            ("PETS_HISTORY_LIMIT", Some("0".to_owned())),
            ("PETS_DB_MAX_CONNECTIONS", Some("0".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.decay_interval(), Duration::from_secs(1));
        assert_eq!(settings.storage_timeout(), Duration::from_millis(1));
        assert_eq!(settings.history_limit(), 1);
        assert_eq!(settings.db_max_connections(), 1);
    }
}
