//! Game lifecycle, roster and score management.
//!
//! The lifecycle and integrity rules themselves live in the stores so both
//! backends enforce them identically; this layer only resolves handles and
//! shapes errors.

use crate::{
    dao::models::{GameEntity, NewGame},
    error::ServiceError,
    state::SharedState,
};

/// All games, newest first.
pub async fn list_games(state: &SharedState) -> Result<Vec<GameEntity>, ServiceError> {
    let store = state.require_score_store().await?;
    Ok(store.list_games().await?)
}

/// Fetch one game.
pub async fn get_game(state: &SharedState, id: i64) -> Result<GameEntity, ServiceError> {
    let store = state.require_score_store().await?;
    store
        .find_game(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("game `{id}` not found")))
}

/// Create an active game seating the initial roster at the template's base
/// points.
pub async fn create_game(
    state: &SharedState,
    name: String,
    template_id: i64,
    player_ids: Vec<i64>,
) -> Result<GameEntity, ServiceError> {
    let store = state.require_score_store().await?;
    Ok(store
        .create_game(NewGame {
            name,
            template_id,
            player_ids,
        })
        .await?)
}

/// Seat one more player in an active game.
pub async fn add_player(
    state: &SharedState,
    game_id: i64,
    player_id: i64,
) -> Result<GameEntity, ServiceError> {
    let store = state.require_score_store().await?;
    Ok(store.add_game_player(game_id, player_id).await?)
}

/// Overwrite a participant's score with an absolute value.
pub async fn set_score(
    state: &SharedState,
    game_id: i64,
    player_id: i64,
    score: i64,
) -> Result<GameEntity, ServiceError> {
    let store = state.require_score_store().await?;
    Ok(store.set_score(game_id, player_id, score).await?)
}

/// End a game, freezing its scores and roster forever.
pub async fn end_game(state: &SharedState, game_id: i64) -> Result<GameEntity, ServiceError> {
    let store = state.require_score_store().await?;
    Ok(store.end_game(game_id).await?)
}
