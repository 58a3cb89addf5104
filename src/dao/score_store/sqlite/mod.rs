//! Embedded relational backend: the SQLite schema is the source of truth for
//! referential integrity and uniqueness; the store maps engine rows onto the
//! shared entities.

mod config;
mod store;

pub use config::SqliteConfig;
pub use store::SqliteScoreStore;
