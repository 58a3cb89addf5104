use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::leaderboard::LeaderboardEntryDto, error::AppError, services::leaderboard_service,
    state::SharedState,
};

/// Public leaderboard endpoint; no authentication required.
pub fn router() -> Router<SharedState> {
    Router::new().route("/leaderboard", get(leaderboard))
}

/// Ranked totals over ended games, recomputed per request.
#[utoipa::path(
    get,
    path = "/leaderboard",
    tag = "leaderboard",
    responses(
        (status = 200, description = "Ranked leaderboard", body = [LeaderboardEntryDto]),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn leaderboard(
    State(state): State<SharedState>,
) -> Result<Json<Vec<LeaderboardEntryDto>>, AppError> {
    let rows = leaderboard_service::leaderboard(&state).await?;
    Ok(Json(rows.into_iter().map(LeaderboardEntryDto::from).collect()))
}
