//! Library crate for poker-points-back, exposing modules for the binary and
//! integration tests.

#[cfg(not(any(feature = "sqlite-store", feature = "github-store")))]
compile_error!("enable at least one storage backend feature: `sqlite-store` or `github-store`");

/// Application configuration loaded from the environment.
pub mod config;
/// Persistence contract, entities and backend implementations.
pub mod dao;
/// Wire-facing request and response types.
pub mod dto;
/// Service and HTTP error types.
pub mod error;
/// Token issuance and the bearer-claims extractor.
pub mod jwt;
/// HTTP route trees.
pub mod routes;
/// Business logic services.
pub mod services;
/// Shared application state.
pub mod state;
