use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use validator::Validate;

use crate::{
    dto::game::{AddGamePlayerRequest, CreateGameRequest, GameDto, SetScoreRequest},
    error::AppError,
    jwt::Claims,
    services::game_service,
    state::SharedState,
};

/// Game session endpoints; mutations are admin-only.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/games", get(list_games).post(create_game))
        .route("/games/{id}", get(get_game))
        .route("/games/{id}/players", post(add_player))
        .route("/games/{id}/players/{player_id}", put(set_score))
        .route("/games/{id}/end", put(end_game))
}

/// All games, newest first, with joined template and ordered roster.
#[utoipa::path(
    get,
    path = "/games",
    tag = "games",
    responses(
        (status = 200, description = "Games newest first", body = [GameDto]),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_games(
    State(state): State<SharedState>,
    _claims: Claims,
) -> Result<Json<Vec<GameDto>>, AppError> {
    let games = game_service::list_games(&state).await?;
    Ok(Json(games.into_iter().map(GameDto::from).collect()))
}

/// One game.
#[utoipa::path(
    get,
    path = "/games/{id}",
    tag = "games",
    params(("id" = i64, Path, description = "Game identifier")),
    responses(
        (status = 200, description = "Game detail", body = GameDto),
        (status = 404, description = "Unknown game")
    )
)]
pub async fn get_game(
    State(state): State<SharedState>,
    _claims: Claims,
    Path(id): Path<i64>,
) -> Result<Json<GameDto>, AppError> {
    let game = game_service::get_game(&state, id).await?;
    Ok(Json(game.into()))
}

/// Create an active game with an initial roster seated at the template's
/// base points.
#[utoipa::path(
    post,
    path = "/games",
    tag = "games",
    request_body = CreateGameRequest,
    responses(
        (status = 201, description = "Created game", body = GameDto),
        (status = 403, description = "Caller is not an administrator"),
        (status = 404, description = "Unknown template or player")
    )
)]
pub async fn create_game(
    State(state): State<SharedState>,
    claims: Claims,
    Json(payload): Json<CreateGameRequest>,
) -> Result<(StatusCode, Json<GameDto>), AppError> {
    claims.require_admin()?;
    payload.validate()?;
    let game = game_service::create_game(
        &state,
        payload.name,
        payload.template_id,
        payload.player_ids,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(game.into())))
}

/// Seat one more player in an active game.
#[utoipa::path(
    post,
    path = "/games/{id}/players",
    tag = "games",
    params(("id" = i64, Path, description = "Game identifier")),
    request_body = AddGamePlayerRequest,
    responses(
        (status = 200, description = "Updated game", body = GameDto),
        (status = 403, description = "Caller is not an administrator"),
        (status = 404, description = "Unknown game or player"),
        (status = 409, description = "Game ended or player already seated")
    )
)]
pub async fn add_player(
    State(state): State<SharedState>,
    claims: Claims,
    Path(id): Path<i64>,
    Json(payload): Json<AddGamePlayerRequest>,
) -> Result<Json<GameDto>, AppError> {
    claims.require_admin()?;
    let game = game_service::add_player(&state, id, payload.player_id).await?;
    Ok(Json(game.into()))
}

/// Overwrite a participant's score with an absolute value.
#[utoipa::path(
    put,
    path = "/games/{id}/players/{player_id}",
    tag = "games",
    params(
        ("id" = i64, Path, description = "Game identifier"),
        ("player_id" = i64, Path, description = "Participant identifier")
    ),
    request_body = SetScoreRequest,
    responses(
        (status = 200, description = "Updated game", body = GameDto),
        (status = 403, description = "Caller is not an administrator"),
        (status = 404, description = "Unknown game or participant"),
        (status = 409, description = "Game already ended")
    )
)]
pub async fn set_score(
    State(state): State<SharedState>,
    claims: Claims,
    Path((id, player_id)): Path<(i64, i64)>,
    Json(payload): Json<SetScoreRequest>,
) -> Result<Json<GameDto>, AppError> {
    claims.require_admin()?;
    let game = game_service::set_score(&state, id, player_id, payload.score).await?;
    Ok(Json(game.into()))
}

/// End a game; its scores and roster are frozen forever.
#[utoipa::path(
    put,
    path = "/games/{id}/end",
    tag = "games",
    params(("id" = i64, Path, description = "Game identifier")),
    responses(
        (status = 200, description = "Ended game", body = GameDto),
        (status = 403, description = "Caller is not an administrator"),
        (status = 404, description = "Unknown game"),
        (status = 409, description = "Game already ended")
    )
)]
pub async fn end_game(
    State(state): State<SharedState>,
    claims: Claims,
    Path(id): Path<i64>,
) -> Result<Json<GameDto>, AppError> {
    claims.require_admin()?;
    let game = game_service::end_game(&state, id).await?;
    Ok(Json(game.into()))
}
