//! Leaderboard aggregation shared by both storage backends.
//!
//! Only ended games count: active games score nothing until frozen. Every
//! player appears, including those who never finished a game.

use crate::{
    dao::models::{GameEntity, GameStatus, PlayerEntity},
    error::ServiceError,
    state::SharedState,
};

/// One computed leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow {
    /// 1-based position after the sort.
    pub rank: usize,
    /// Player account id.
    pub player_id: i64,
    /// Player display name.
    pub name: String,
    /// Sum of final scores across ended games.
    pub total_points: i64,
    /// Number of ended games the player took part in.
    pub games_played: usize,
}

/// Fetch the current leaderboard.
pub async fn leaderboard(state: &SharedState) -> Result<Vec<LeaderboardRow>, ServiceError> {
    let store = state.require_score_store().await?;
    let players = store.list_players().await?;
    let games = store.list_games().await?;
    Ok(compute(&players, &games))
}

/// Aggregate ended-game scores into ranked rows.
///
/// The sort is stable and descending on total, so tied totals keep the
/// incoming (name-ordered) player order and still receive distinct
/// consecutive ranks.
pub fn compute(players: &[PlayerEntity], games: &[GameEntity]) -> Vec<LeaderboardRow> {
    let mut rows: Vec<LeaderboardRow> = players
        .iter()
        .map(|player| LeaderboardRow {
            rank: 0,
            player_id: player.id,
            name: player.name.clone(),
            total_points: 0,
            games_played: 0,
        })
        .collect();

    for game in games.iter().filter(|g| g.status == GameStatus::Ended) {
        for entry in &game.players {
            if let Some(row) = rows.iter_mut().find(|r| r.player_id == entry.player_id) {
                row.total_points += entry.score;
                row.games_played += 1;
            }
        }
    }

    rows.sort_by(|a, b| b.total_points.cmp(&a.total_points));
    for (position, row) in rows.iter_mut().enumerate() {
        row.rank = position + 1;
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::{GamePlayerEntity, Role};
    use chrono::Utc;

    fn player(id: i64, name: &str) -> PlayerEntity {
        PlayerEntity {
            id,
            name: name.into(),
            email: format!("{name}@poker.com").to_lowercase(),
            role: Role::Player,
            created_at: Utc::now(),
        }
    }

    fn game(status: GameStatus, scores: &[(i64, &str, i64)]) -> GameEntity {
        GameEntity {
            id: 1,
            name: "g".into(),
            template_id: Some(1),
            template_name: Some("t".into()),
            base_points: Some(0),
            status,
            created_at: Utc::now(),
            ended_at: (status == GameStatus::Ended).then(Utc::now),
            players: scores
                .iter()
                .map(|(id, name, score)| GamePlayerEntity {
                    player_id: *id,
                    name: (*name).into(),
                    score: *score,
                })
                .collect(),
        }
    }

    #[test]
    fn only_ended_games_count() {
        let players = vec![player(1, "Ann"), player(2, "Ben")];
        let games = vec![
            game(GameStatus::Ended, &[(1, "Ann", 400), (2, "Ben", 600)]),
            game(GameStatus::Active, &[(1, "Ann", 9_000)]),
        ];

        let rows = compute(&players, &games);
        assert_eq!(rows[0].name, "Ben");
        assert_eq!(rows[0].total_points, 600);
        assert_eq!(rows[1].total_points, 400);
        assert_eq!(rows[1].games_played, 1);
    }

    #[test]
    fn ties_keep_incoming_order_with_distinct_ranks() {
        let players = vec![player(1, "Ann"), player(2, "Ben"), player(3, "Cal")];
        let games = vec![game(
            GameStatus::Ended,
            &[(1, "Ann", 300), (2, "Ben", 300), (3, "Cal", 100)],
        )];

        let rows = compute(&players, &games);
        let ranks: Vec<_> = rows.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(rows[0].name, "Ann");
        assert_eq!(rows[1].name, "Ben");
        assert_eq!(rows[2].total_points, 100);
    }

    #[test]
    fn players_without_ended_games_appear_with_zero() {
        let players = vec![player(1, "Ann"), player(2, "Ben")];
        let games = vec![game(GameStatus::Ended, &[(1, "Ann", 250)])];

        let rows = compute(&players, &games);
        assert_eq!(rows[1].player_id, 2);
        assert_eq!(rows[1].total_points, 0);
        assert_eq!(rows[1].games_played, 0);
        assert_eq!(rows[1].rank, 2);
    }

    #[test]
    fn totals_accumulate_across_multiple_ended_games() {
        let players = vec![player(1, "Ann")];
        let games = vec![
            game(GameStatus::Ended, &[(1, "Ann", 100)]),
            game(GameStatus::Ended, &[(1, "Ann", -40)]),
        ];

        let rows = compute(&players, &games);
        assert_eq!(rows[0].total_points, 60);
        assert_eq!(rows[0].games_played, 2);
    }
}
