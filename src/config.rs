//! Application-level configuration loading from the environment.

use std::env;

use tracing::{info, warn};

/// Default listen port when neither `PORT` nor `SERVER_PORT` is set.
const DEFAULT_PORT: u16 = 3001;
/// Environment variable selecting the persistence backend.
const BACKEND_ENV: &str = "POKER_STORAGE_BACKEND";

/// Which persistence backend the supervisor should connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackendKind {
    /// Embedded relational store.
    #[cfg(feature = "sqlite-store")]
    Sqlite,
    /// Remote whole-file JSON document store.
    #[cfg(feature = "github-store")]
    Github,
}

/// Immutable runtime configuration shared across the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// TCP port the HTTP server binds.
    pub port: u16,
    /// Selected persistence backend.
    pub backend: StorageBackendKind,
}

impl AppConfig {
    /// Load the configuration from the environment, falling back to defaults.
    pub fn load() -> Self {
        let port = env::var("PORT")
            .or_else(|_| env::var("SERVER_PORT"))
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let backend = resolve_backend();
        info!(?backend, port, "loaded application configuration");

        Self { port, backend }
    }
}

fn resolve_backend() -> StorageBackendKind {
    let requested = env::var(BACKEND_ENV).ok();
    match requested.as_deref() {
        #[cfg(feature = "sqlite-store")]
        Some("sqlite") | None => StorageBackendKind::Sqlite,
        #[cfg(feature = "github-store")]
        Some("github") => StorageBackendKind::Github,
        Some(other) => {
            warn!(value = other, "unknown {BACKEND_ENV}; using the default backend");
            default_backend()
        }
        #[allow(unreachable_patterns)]
        None => default_backend(),
    }
}

fn default_backend() -> StorageBackendKind {
    #[cfg(feature = "sqlite-store")]
    {
        StorageBackendKind::Sqlite
    }
    #[cfg(all(feature = "github-store", not(feature = "sqlite-store")))]
    {
        StorageBackendKind::Github
    }
}
