use axum::{
    Json, Router,
    extract::State,
    routing::{get, post, put},
};
use validator::Validate;

use crate::{
    dto::{
        auth::{AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest},
        player::PlayerDto,
    },
    error::AppError,
    jwt::Claims,
    services::auth_service,
    state::SharedState,
};

/// Authentication and profile self-service endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/me", get(me))
        .route("/auth/profile", put(update_profile))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = AuthResponse),
        (status = 401, description = "Unknown email or wrong password")
    )
)]
pub async fn login(
    State(state): State<SharedState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;
    let (token, player) = auth_service::login(&state, payload.email, payload.password).await?;
    Ok(Json(AuthResponse {
        token,
        player: player.into(),
    }))
}

/// Self-service registration; permanently refused.
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses((status = 403, description = "Registration is disabled"))
)]
pub async fn register(Json(_payload): Json<RegisterRequest>) -> Result<(), AppError> {
    Err(auth_service::register().into())
}

/// Profile of the authenticated account.
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current profile", body = PlayerDto),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Account no longer exists")
    )
)]
pub async fn me(
    State(state): State<SharedState>,
    claims: Claims,
) -> Result<Json<PlayerDto>, AppError> {
    let player = auth_service::current_player(&state, claims.sub).await?;
    Ok(Json(player.into()))
}

/// Update the authenticated account's own name and/or password.
#[utoipa::path(
    put,
    path = "/auth/profile",
    tag = "auth",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = PlayerDto),
        (status = 400, description = "Empty update or invalid fields"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn update_profile(
    State(state): State<SharedState>,
    claims: Claims,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<PlayerDto>, AppError> {
    payload.validate()?;
    let player =
        auth_service::update_profile(&state, claims.sub, payload.name, payload.password).await?;
    Ok(Json(player.into()))
}
