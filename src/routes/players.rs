use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use validator::Validate;

use crate::{
    dto::player::{CreatePlayerRequest, PlayerDto, UpdatePlayerRequest},
    error::AppError,
    jwt::Claims,
    services::player_service,
    state::SharedState,
};

/// Player account endpoints; mutations are admin-only.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/players", get(list_players).post(create_player))
        .route(
            "/players/{id}",
            get(get_player).put(update_player).delete(delete_player),
        )
}

/// All player accounts, without password material.
#[utoipa::path(
    get,
    path = "/players",
    tag = "players",
    responses(
        (status = 200, description = "Player accounts ordered by name", body = [PlayerDto]),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_players(
    State(state): State<SharedState>,
    _claims: Claims,
) -> Result<Json<Vec<PlayerDto>>, AppError> {
    let players = player_service::list_players(&state).await?;
    Ok(Json(players.into_iter().map(PlayerDto::from).collect()))
}

/// One player account.
#[utoipa::path(
    get,
    path = "/players/{id}",
    tag = "players",
    params(("id" = i64, Path, description = "Player identifier")),
    responses(
        (status = 200, description = "Player account", body = PlayerDto),
        (status = 404, description = "Unknown player")
    )
)]
pub async fn get_player(
    State(state): State<SharedState>,
    _claims: Claims,
    Path(id): Path<i64>,
) -> Result<Json<PlayerDto>, AppError> {
    let player = player_service::get_player(&state, id).await?;
    Ok(Json(player.into()))
}

/// Create a player account.
#[utoipa::path(
    post,
    path = "/players",
    tag = "players",
    request_body = CreatePlayerRequest,
    responses(
        (status = 201, description = "Created account", body = PlayerDto),
        (status = 403, description = "Caller is not an administrator"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_player(
    State(state): State<SharedState>,
    claims: Claims,
    Json(payload): Json<CreatePlayerRequest>,
) -> Result<(StatusCode, Json<PlayerDto>), AppError> {
    claims.require_admin()?;
    payload.validate()?;
    let player =
        player_service::create_player(&state, payload.name, payload.email, payload.password)
            .await?;
    Ok((StatusCode::CREATED, Json(player.into())))
}

/// Patch a player account's name and/or password.
#[utoipa::path(
    put,
    path = "/players/{id}",
    tag = "players",
    params(("id" = i64, Path, description = "Player identifier")),
    request_body = UpdatePlayerRequest,
    responses(
        (status = 200, description = "Updated account", body = PlayerDto),
        (status = 403, description = "Caller is not an administrator"),
        (status = 404, description = "Unknown player")
    )
)]
pub async fn update_player(
    State(state): State<SharedState>,
    claims: Claims,
    Path(id): Path<i64>,
    Json(payload): Json<UpdatePlayerRequest>,
) -> Result<Json<PlayerDto>, AppError> {
    claims.require_admin()?;
    payload.validate()?;
    let player =
        player_service::update_player(&state, id, payload.name, payload.password).await?;
    Ok(Json(player.into()))
}

/// Delete a player account and its roster rows across all games.
#[utoipa::path(
    delete,
    path = "/players/{id}",
    tag = "players",
    params(("id" = i64, Path, description = "Player identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Caller is not an administrator, or the target is one"),
        (status = 404, description = "Unknown player")
    )
)]
pub async fn delete_player(
    State(state): State<SharedState>,
    claims: Claims,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    claims.require_admin()?;
    player_service::delete_player(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
