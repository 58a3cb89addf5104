use serde::Serialize;
use utoipa::ToSchema;

use crate::services::leaderboard_service::LeaderboardRow;

/// One leaderboard row. Ranks are dense positions in the sorted order; tied
/// totals keep distinct consecutive ranks.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaderboardEntryDto {
    /// 1-based position.
    pub rank: usize,
    pub player_id: i64,
    pub name: String,
    /// Sum of the player's final scores across ended games.
    pub total_points: i64,
    /// Number of ended games the player took part in.
    pub games_played: usize,
}

impl From<LeaderboardRow> for LeaderboardEntryDto {
    fn from(row: LeaderboardRow) -> Self {
        Self {
            rank: row.rank,
            player_id: row.player_id,
            name: row.name,
            total_points: row.total_points,
            games_played: row.games_played,
        }
    }
}
