use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dto::player::PlayerDto;

/// Login credentials.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

/// Self-service registration payload. Accounts are provisioned by
/// administrators only, so this request is always refused; the type exists to
/// keep the endpoint documented.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Successful login: a bearer token plus the authenticated account.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    /// Signed JWT to present as `Authorization: Bearer <token>`.
    pub token: String,
    pub player: PlayerDto,
}

/// Self-service profile update for the authenticated account.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: Option<String>,
}
