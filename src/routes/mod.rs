use axum::Router;

use crate::state::SharedState;

pub mod auth;
pub mod docs;
pub mod games;
pub mod health;
pub mod leaderboard;
pub mod players;
pub mod templates;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(auth::router())
        .merge(players::router())
        .merge(templates::router())
        .merge(games::router())
        .merge(leaderboard::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
