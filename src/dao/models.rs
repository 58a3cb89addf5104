use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Access role attached to a player account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Administrator: may mutate templates, players and games.
    Admin,
    /// Regular participant.
    Player,
}

impl Role {
    /// Lowercase wire representation, shared with the SQLite column encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Player => "player",
        }
    }
}

/// Player account stored in persistence and shared across layers.
///
/// Password material never travels on this type; see [`PlayerCredentials`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Stable identifier for the account.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Unique login email.
    pub email: String,
    /// Access role.
    pub role: Role,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Player account together with its password hash, returned only by
/// credential lookups during login.
#[derive(Debug, Clone)]
pub struct PlayerCredentials {
    /// The sanitized account.
    pub player: PlayerEntity,
    /// bcrypt hash of the account password.
    pub password_hash: String,
}

/// Payload for creating a player account. The hash is produced at the
/// service boundary; stores never see a cleartext password.
#[derive(Debug, Clone)]
pub struct NewPlayer {
    /// Display name.
    pub name: String,
    /// Unique login email.
    pub email: String,
    /// bcrypt hash of the initial password.
    pub password_hash: String,
    /// Role assigned to the account.
    pub role: Role,
}

/// Partial player update; only provided fields are patched.
#[derive(Debug, Clone, Default)]
pub struct PlayerPatch {
    /// New display name, when present.
    pub name: Option<String>,
    /// New bcrypt password hash, when present.
    pub password_hash: Option<String>,
}

/// Scoring template defining the starting score for new game participants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TemplateEntity {
    /// Stable identifier for the template.
    pub id: i64,
    /// Human readable template name.
    pub name: String,
    /// Starting score handed to each participant.
    pub base_points: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Payload for creating or replacing a template.
#[derive(Debug, Clone)]
pub struct NewTemplate {
    /// Human readable template name.
    pub name: String,
    /// Starting score handed to each participant.
    pub base_points: i64,
}

/// Lifecycle state of a game session. `Ended` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// Scores and roster may still change.
    Active,
    /// Frozen forever; only ended games feed the leaderboard.
    Ended,
}

impl GameStatus {
    /// Lowercase wire representation, shared with the SQLite column encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Active => "active",
            GameStatus::Ended => "ended",
        }
    }
}

/// A player's membership and running score within one game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GamePlayerEntity {
    /// Identifier of the participating player.
    pub player_id: i64,
    /// Display name joined in from the player account.
    pub name: String,
    /// Current score (absolute value, not a delta).
    pub score: i64,
}

/// Aggregate game session as returned by store reads: template data joined
/// in, roster ordered by score descending.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameEntity {
    /// Primary key of the game.
    pub id: i64,
    /// Display name of the session.
    pub name: String,
    /// Referenced template; may dangle after a template deletion.
    pub template_id: Option<i64>,
    /// Joined template name, absent when the template is gone.
    pub template_name: Option<String>,
    /// Joined template base points, absent when the template is gone.
    pub base_points: Option<i64>,
    /// Lifecycle state.
    pub status: GameStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Set exactly once when the game ends.
    pub ended_at: Option<DateTime<Utc>>,
    /// Participants ordered by score descending.
    pub players: Vec<GamePlayerEntity>,
}

/// Payload for creating a game with its initial roster.
#[derive(Debug, Clone)]
pub struct NewGame {
    /// Display name of the session.
    pub name: String,
    /// Template seeding the starting scores.
    pub template_id: i64,
    /// Players seated at creation, each starting at the template base points.
    pub player_ids: Vec<i64>,
}
