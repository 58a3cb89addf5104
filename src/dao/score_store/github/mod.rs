//! Whole-file JSON document backend: the entire state lives in one document
//! inside a GitHub repository, read via the contents API and written back as
//! a single revision-guarded replace.
//!
//! All contract semantics (joins, cascades, uniqueness, lifecycle checks) are
//! pure functions over the in-memory document in [`document`]; [`store`] only
//! moves the document across the wire.

mod config;
pub mod document;
mod error;
mod store;

pub use config::GithubConfig;
pub use store::GithubScoreStore;
