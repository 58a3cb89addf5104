/// Login, registration policy and profile self-service.
pub mod auth_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Game lifecycle, rosters and scoring.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Leaderboard aggregation over ended games.
pub mod leaderboard_service;
/// Player account management.
pub mod player_service;
/// Scoring template management.
pub mod template_service;
/// Storage connection supervisor with degraded mode.
pub mod storage_supervisor;
