//! End-to-end contract suite for the relational backend, exercising the same
//! integrity rules the document backend covers with its inline unit tests.

#![cfg(feature = "sqlite-store")]

use std::{env, path::PathBuf, sync::Arc};

use uuid::Uuid;

use poker_points_back::{
    dao::{
        models::{GameStatus, NewGame, NewPlayer, NewTemplate, Role},
        score_store::{
            ScoreStore,
            sqlite::{SqliteConfig, SqliteScoreStore},
        },
        storage::StorageError,
    },
    error::ServiceError,
    services::{leaderboard_service, player_service},
    state::AppState,
};

/// Database file in the system temp directory, removed when the test ends.
struct TempDb {
    path: PathBuf,
}

impl TempDb {
    fn new() -> Self {
        let path = env::temp_dir().join(format!("poker-points-test-{}.db", Uuid::new_v4()));
        Self { path }
    }

    async fn connect(&self) -> SqliteScoreStore {
        let config = SqliteConfig::new(self.path.to_string_lossy().to_string());
        SqliteScoreStore::connect(config)
            .await
            .expect("open test database")
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut name = self.path.as_os_str().to_os_string();
            name.push(suffix);
            let _ = std::fs::remove_file(name);
        }
    }
}

fn new_player(name: &str, email: &str) -> NewPlayer {
    NewPlayer {
        name: name.into(),
        email: email.into(),
        password_hash: "$2b$12$fakehashfortests".into(),
        role: Role::Player,
    }
}

#[tokio::test]
async fn connect_seeds_admin_and_stock_templates() {
    let db = TempDb::new();
    let store = db.connect().await;

    let admin = store
        .find_credentials("admin@poker.com".into())
        .await
        .expect("lookup")
        .expect("seed admin exists");
    assert_eq!(admin.player.role, Role::Admin);
    assert!(admin.password_hash.starts_with("$2"));

    let names: Vec<_> = store
        .list_templates()
        .await
        .expect("list templates")
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["Board Game Night", "Omaha", "Texas Hold'em"]);

    // Reconnecting must not duplicate the seeds.
    drop(store);
    let store = db.connect().await;
    assert_eq!(store.list_templates().await.expect("list").len(), 3);
    assert_eq!(store.list_players().await.expect("list").len(), 1);
}

#[tokio::test]
async fn full_game_flow_feeds_the_leaderboard() {
    let db = TempDb::new();
    let store = db.connect().await;

    let ann = store
        .create_player(new_player("Ann", "ann@poker.com"))
        .await
        .expect("create ann");
    let ben = store
        .create_player(new_player("Ben", "ben@poker.com"))
        .await
        .expect("create ben");

    let holdem = store
        .list_templates()
        .await
        .expect("templates")
        .into_iter()
        .find(|t| t.name == "Texas Hold'em")
        .expect("seeded template");
    assert_eq!(holdem.base_points, 1000);

    let game = store
        .create_game(NewGame {
            name: "Friday Night".into(),
            template_id: holdem.id,
            player_ids: vec![ann.id, ben.id],
        })
        .await
        .expect("create game");
    assert_eq!(game.status, GameStatus::Active);
    assert!(game.players.iter().all(|p| p.score == 1000));

    store
        .set_score(game.id, ann.id, 1400)
        .await
        .expect("score ann");
    store
        .set_score(game.id, ben.id, 600)
        .await
        .expect("score ben");

    // Active games contribute nothing yet.
    let players = store.list_players().await.expect("players");
    let games = store.list_games().await.expect("games");
    assert!(
        leaderboard_service::compute(&players, &games)
            .iter()
            .all(|row| row.total_points == 0)
    );

    let ended = store.end_game(game.id).await.expect("end game");
    assert_eq!(ended.status, GameStatus::Ended);
    assert!(ended.ended_at.is_some());
    // Roster reads back score-descending.
    assert_eq!(ended.players[0].player_id, ann.id);

    let games = store.list_games().await.expect("games");
    let rows = leaderboard_service::compute(&players, &games);
    assert_eq!(rows[0].player_id, ann.id);
    assert_eq!(rows[0].total_points, 1400);
    assert_eq!(rows[0].rank, 1);
    assert_eq!(rows[1].player_id, ben.id);
    assert_eq!(rows[1].total_points, 600);
    assert_eq!(rows[1].games_played, 1);
    // The seed admin never played and still appears, ranked last.
    assert_eq!(rows[2].total_points, 0);
    assert_eq!(rows[2].rank, 3);
}

#[tokio::test]
async fn duplicate_emails_and_duplicate_seats_are_rejected() {
    let db = TempDb::new();
    let store = db.connect().await;

    let ann = store
        .create_player(new_player("Ann", "ann@poker.com"))
        .await
        .expect("create ann");
    let err = store
        .create_player(new_player("Ann Again", "ann@poker.com"))
        .await
        .expect_err("duplicate email");
    assert!(matches!(err, StorageError::AlreadyExists { .. }));

    let holdem = store.list_templates().await.expect("templates")[2].clone();

    // Listing the same player twice at creation is as invalid as seating
    // them twice afterwards, and nothing is created.
    let err = store
        .create_game(NewGame {
            name: "Friday".into(),
            template_id: holdem.id,
            player_ids: vec![ann.id, ann.id],
        })
        .await
        .expect_err("duplicate initial roster");
    assert!(matches!(err, StorageError::AlreadyExists { .. }));
    assert!(store.list_games().await.expect("games").is_empty());

    let game = store
        .create_game(NewGame {
            name: "Friday".into(),
            template_id: holdem.id,
            player_ids: vec![ann.id],
        })
        .await
        .expect("create game");

    let err = store
        .add_game_player(game.id, ann.id)
        .await
        .expect_err("duplicate seat");
    assert!(matches!(err, StorageError::AlreadyExists { .. }));
    let roster = store
        .find_game(game.id)
        .await
        .expect("find")
        .expect("game exists")
        .players;
    assert_eq!(roster.len(), 1);
}

#[tokio::test]
async fn ended_games_are_frozen() {
    let db = TempDb::new();
    let store = db.connect().await;

    let ann = store
        .create_player(new_player("Ann", "ann@poker.com"))
        .await
        .expect("create ann");
    let ben = store
        .create_player(new_player("Ben", "ben@poker.com"))
        .await
        .expect("create ben");
    let template = store
        .create_template(NewTemplate {
            name: "Short Stack".into(),
            base_points: 200,
        })
        .await
        .expect("create template");

    let game = store
        .create_game(NewGame {
            name: "Friday".into(),
            template_id: template.id,
            player_ids: vec![ann.id],
        })
        .await
        .expect("create game");
    store.end_game(game.id).await.expect("end");

    assert!(matches!(
        store.end_game(game.id).await,
        Err(StorageError::InvalidState(_))
    ));
    assert!(matches!(
        store.add_game_player(game.id, ben.id).await,
        Err(StorageError::InvalidState(_))
    ));
    assert!(matches!(
        store.set_score(game.id, ann.id, 9000).await,
        Err(StorageError::InvalidState(_))
    ));

    let unchanged = store
        .find_game(game.id)
        .await
        .expect("find")
        .expect("game exists");
    assert_eq!(unchanged.players[0].score, 200);
}

#[tokio::test]
async fn deleting_a_player_cascades_roster_rows() {
    let db = TempDb::new();
    let store = db.connect().await;

    let ann = store
        .create_player(new_player("Ann", "ann@poker.com"))
        .await
        .expect("create ann");
    let ben = store
        .create_player(new_player("Ben", "ben@poker.com"))
        .await
        .expect("create ben");
    let template = store.list_templates().await.expect("templates")[0].clone();
    let game = store
        .create_game(NewGame {
            name: "Friday".into(),
            template_id: template.id,
            player_ids: vec![ann.id, ben.id],
        })
        .await
        .expect("create game");

    store.delete_player(ann.id).await.expect("delete ann");

    let roster = store
        .find_game(game.id)
        .await
        .expect("find")
        .expect("game exists")
        .players;
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].player_id, ben.id);
    assert!(store.find_player(ann.id).await.expect("find").is_none());
}

#[tokio::test]
async fn deleted_templates_dangle_without_breaking_games() {
    let db = TempDb::new();
    let store = db.connect().await;

    let ann = store
        .create_player(new_player("Ann", "ann@poker.com"))
        .await
        .expect("create ann");
    let ben = store
        .create_player(new_player("Ben", "ben@poker.com"))
        .await
        .expect("create ben");
    let template = store
        .create_template(NewTemplate {
            name: "Deep Stack".into(),
            base_points: 5000,
        })
        .await
        .expect("create template");
    let game = store
        .create_game(NewGame {
            name: "Friday".into(),
            template_id: template.id,
            player_ids: vec![ann.id],
        })
        .await
        .expect("create game");

    store.delete_template(template.id).await.expect("delete");
    // Idempotent: deleting again is not an error.
    store.delete_template(template.id).await.expect("redelete");

    let game = store
        .add_game_player(game.id, ben.id)
        .await
        .expect("seat ben");
    assert_eq!(game.template_name, None);
    assert_eq!(game.base_points, None);
    let ben_row = game
        .players
        .iter()
        .find(|p| p.player_id == ben.id)
        .expect("ben seated");
    assert_eq!(ben_row.score, 0);
    let ann_row = game
        .players
        .iter()
        .find(|p| p.player_id == ann.id)
        .expect("ann kept");
    assert_eq!(ann_row.score, 5000);

    assert!(matches!(
        store
            .update_template(template.id, NewTemplate {
                name: "Gone".into(),
                base_points: 1,
            })
            .await,
        Err(StorageError::NotFound { .. })
    ));
}

#[tokio::test]
async fn admin_accounts_cannot_be_deleted_through_the_service() {
    let db = TempDb::new();
    let store = db.connect().await;

    let state = AppState::new();
    state.install_score_store(Arc::new(store.clone())).await;

    let admin = store
        .find_credentials("admin@poker.com".into())
        .await
        .expect("lookup")
        .expect("seed admin");

    let err = player_service::delete_player(&state, admin.player.id)
        .await
        .expect_err("admin is protected");
    assert!(matches!(err, ServiceError::Forbidden(_)));
    assert!(
        store
            .find_player(admin.player.id)
            .await
            .expect("find")
            .is_some()
    );
}

#[tokio::test]
async fn unknown_references_surface_not_found() {
    let db = TempDb::new();
    let store = db.connect().await;

    let template = store.list_templates().await.expect("templates")[0].clone();

    assert!(matches!(
        store
            .create_game(NewGame {
                name: "Friday".into(),
                template_id: 9999,
                player_ids: vec![],
            })
            .await,
        Err(StorageError::NotFound { .. })
    ));
    assert!(matches!(
        store
            .create_game(NewGame {
                name: "Friday".into(),
                template_id: template.id,
                player_ids: vec![9999],
            })
            .await,
        Err(StorageError::NotFound { .. })
    ));

    let game = store
        .create_game(NewGame {
            name: "Friday".into(),
            template_id: template.id,
            player_ids: vec![],
        })
        .await
        .expect("create game");
    assert!(matches!(
        store.set_score(game.id, 9999, 100).await,
        Err(StorageError::NotFound { .. })
    ));
    assert!(matches!(
        store.end_game(9999).await,
        Err(StorageError::NotFound { .. })
    ));
}
