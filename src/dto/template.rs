use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dao::models::TemplateEntity;

/// Scoring template as exposed over the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TemplateDto {
    pub id: i64,
    pub name: String,
    pub base_points: i64,
    pub created_at: DateTime<Utc>,
}

impl From<TemplateEntity> for TemplateDto {
    fn from(entity: TemplateEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            base_points: entity.base_points,
            created_at: entity.created_at,
        }
    }
}

/// Payload shared by template creation and replacement.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct TemplateRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(range(min = 0, message = "base points must not be negative"))]
    pub base_points: i64,
}
