use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dao::models::{PlayerEntity, Role};

/// Player account as exposed over the API. Never carries password material.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlayerDto {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// "admin" or "player".
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<PlayerEntity> for PlayerDto {
    fn from(entity: PlayerEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            email: entity.email,
            role: entity.role,
            created_at: entity.created_at,
        }
    }
}

/// Payload for an admin creating a player account.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreatePlayerRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}

/// Partial player update; omitted fields are left untouched.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdatePlayerRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: Option<String>,
}

impl UpdatePlayerRequest {
    /// True when the request would patch nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.password.is_none()
    }
}
