use std::env;

/// Runtime configuration for the embedded SQLite store.
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Path of the database file; created when missing.
    pub path: String,
    /// Upper bound of pooled connections.
    pub max_connections: u32,
}

impl SqliteConfig {
    /// Construct a configuration for an explicit database path.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            max_connections: 5,
        }
    }

    /// Build a configuration by reading the expected environment variables.
    pub fn from_env() -> Self {
        let path = env::var("POKER_SQLITE_PATH").unwrap_or_else(|_| "poker.db".into());
        Self::new(path)
    }
}
