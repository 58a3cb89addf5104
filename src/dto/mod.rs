//! Wire-facing request and response types, kept separate from the dao
//! entities so storage details never leak into the HTTP surface.

pub mod auth;
pub mod game;
pub mod health;
pub mod leaderboard;
pub mod player;
pub mod template;

/// Display name rendered for games whose template was deleted.
pub(crate) const CUSTOM_TEMPLATE_NAME: &str = "Custom";
