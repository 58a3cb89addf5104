use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dao::models::{GameEntity, GamePlayerEntity, GameStatus},
    dto::CUSTOM_TEMPLATE_NAME,
};

/// One roster entry of a game.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GamePlayerDto {
    pub player_id: i64,
    pub name: String,
    pub score: i64,
}

impl From<GamePlayerEntity> for GamePlayerDto {
    fn from(entity: GamePlayerEntity) -> Self {
        Self {
            player_id: entity.player_id,
            name: entity.name,
            score: entity.score,
        }
    }
}

/// Game session as exposed over the API. A deleted template renders as
/// "Custom" with zero base points instead of failing the read.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GameDto {
    pub id: i64,
    pub name: String,
    pub template_id: Option<i64>,
    pub template_name: String,
    pub base_points: i64,
    /// "active" or "ended".
    pub status: GameStatus,
    pub created_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    /// Roster ordered by score descending.
    pub players: Vec<GamePlayerDto>,
}

impl From<GameEntity> for GameDto {
    fn from(entity: GameEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            template_id: entity.template_id,
            template_name: entity
                .template_name
                .unwrap_or_else(|| CUSTOM_TEMPLATE_NAME.into()),
            base_points: entity.base_points.unwrap_or(0),
            status: entity.status,
            created_at: entity.created_at,
            ended_at: entity.ended_at,
            players: entity.players.into_iter().map(GamePlayerDto::from).collect(),
        }
    }
}

/// Payload for creating a game with its initial roster.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateGameRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub template_id: i64,
    /// Players seated at creation; may be empty.
    #[serde(default)]
    pub player_ids: Vec<i64>,
}

/// Payload for seating one more player in a game.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddGamePlayerRequest {
    pub player_id: i64,
}

/// Payload overwriting a participant's score with an absolute value.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetScoreRequest {
    pub score: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn dangling_template_renders_as_custom() {
        let entity = GameEntity {
            id: 7,
            name: "Friday".into(),
            template_id: Some(42),
            template_name: None,
            base_points: None,
            status: GameStatus::Active,
            created_at: Utc::now(),
            ended_at: None,
            players: vec![],
        };

        let dto = GameDto::from(entity);
        assert_eq!(dto.template_name, "Custom");
        assert_eq!(dto.base_points, 0);
        assert_eq!(dto.template_id, Some(42));
    }
}
