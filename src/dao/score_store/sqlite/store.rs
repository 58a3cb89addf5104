use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use sqlx::{
    Pool, Row, Sqlite,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
};
use tracing::info;

use crate::dao::{
    models::{
        GameEntity, GamePlayerEntity, GameStatus, NewGame, NewPlayer, NewTemplate,
        PlayerCredentials, PlayerEntity, PlayerPatch, Role, TemplateEntity,
    },
    score_store::ScoreStore,
    storage::{StorageError, StorageResult},
};

use super::config::SqliteConfig;

/// Default credentials seeded when the database holds no admin account.
const SEED_ADMIN_NAME: &str = "Admin";
const SEED_ADMIN_EMAIL: &str = "admin@poker.com";
const SEED_ADMIN_PASSWORD: &str = "admin123";

// games.template_id intentionally carries no foreign key: deleting a template
// that games still reference is permitted and leaves their reference dangling.
const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT UNIQUE NOT NULL,
        password TEXT NOT NULL,
        role TEXT NOT NULL DEFAULT 'player',
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS templates (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        base_points INTEGER NOT NULL DEFAULT 1000,
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS games (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        template_id INTEGER,
        status TEXT NOT NULL DEFAULT 'active',
        created_at TEXT NOT NULL,
        ended_at TEXT
    );

    CREATE TABLE IF NOT EXISTS game_players (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        game_id INTEGER NOT NULL,
        player_id INTEGER NOT NULL,
        score INTEGER NOT NULL DEFAULT 0,
        FOREIGN KEY (game_id) REFERENCES games(id),
        FOREIGN KEY (player_id) REFERENCES users(id),
        UNIQUE(game_id, player_id)
    );
";

/// [`ScoreStore`] backed by an embedded SQLite database.
#[derive(Clone)]
pub struct SqliteScoreStore {
    pool: Pool<Sqlite>,
}

impl SqliteScoreStore {
    /// Open (or create) the database file, apply the schema and seed defaults.
    pub async fn connect(config: SqliteConfig) -> StorageResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(|err| StorageError::unavailable("opening sqlite database", err))?;

        let store = Self { pool };
        store.apply_schema().await?;
        store.seed_defaults().await?;
        Ok(store)
    }

    async fn apply_schema(&self) -> StorageResult<()> {
        for statement in SCHEMA.split(';').filter(|s| !s.trim().is_empty()) {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|err| StorageError::backend("applying schema", err))?;
        }
        Ok(())
    }

    /// Insert the seed admin account and default templates when absent.
    async fn seed_defaults(&self) -> StorageResult<()> {
        let admin = sqlx::query("SELECT id FROM users WHERE role = ?")
            .bind(Role::Admin.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::backend("checking seed admin", err))?;

        if admin.is_none() {
            let password = std::env::var("POKER_ADMIN_PASSWORD")
                .unwrap_or_else(|_| SEED_ADMIN_PASSWORD.into());
            let hash = bcrypt::hash(&password, bcrypt::DEFAULT_COST)
                .map_err(|err| StorageError::backend("hashing seed password", err))?;
            sqlx::query(
                "INSERT INTO users (name, email, password, role, created_at) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(SEED_ADMIN_NAME)
            .bind(SEED_ADMIN_EMAIL)
            .bind(&hash)
            .bind(Role::Admin.as_str())
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|err| StorageError::backend("seeding admin account", err))?;
            info!(email = SEED_ADMIN_EMAIL, "seeded default admin account");
        }

        let any_template = sqlx::query("SELECT id FROM templates LIMIT 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::backend("checking seed templates", err))?;

        if any_template.is_none() {
            for (name, base_points) in [
                ("Texas Hold'em", 1000_i64),
                ("Omaha", 1500),
                ("Board Game Night", 100),
            ] {
                sqlx::query(
                    "INSERT INTO templates (name, base_points, created_at) VALUES (?, ?, ?)",
                )
                .bind(name)
                .bind(base_points)
                .bind(Utc::now())
                .execute(&self.pool)
                .await
                .map_err(|err| StorageError::backend("seeding templates", err))?;
            }
            info!("seeded default templates");
        }

        Ok(())
    }

    fn player_from_row(row: &SqliteRow) -> StorageResult<PlayerEntity> {
        Ok(PlayerEntity {
            id: get(row, "id")?,
            name: get(row, "name")?,
            email: get(row, "email")?,
            role: role_from_str(&get::<String>(row, "role")?),
            created_at: get(row, "created_at")?,
        })
    }

    fn template_from_row(row: &SqliteRow) -> StorageResult<TemplateEntity> {
        Ok(TemplateEntity {
            id: get(row, "id")?,
            name: get(row, "name")?,
            base_points: get(row, "base_points")?,
            created_at: get(row, "created_at")?,
        })
    }

    async fn fetch_player(&self, id: i64) -> StorageResult<Option<PlayerEntity>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::backend("querying player", err))?;
        row.as_ref().map(Self::player_from_row).transpose()
    }

    /// Read one game with its joined template and score-ordered roster.
    async fn fetch_game(&self, id: i64) -> StorageResult<Option<GameEntity>> {
        let row = sqlx::query(
            "SELECT g.*, t.name AS template_name, t.base_points AS base_points
             FROM games g LEFT JOIN templates t ON g.template_id = t.id
             WHERE g.id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::backend("querying game", err))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let players = self.fetch_roster(id).await?;
        Ok(Some(Self::game_from_row(&row, players)?))
    }

    async fn fetch_roster(&self, game_id: i64) -> StorageResult<Vec<GamePlayerEntity>> {
        let rows = sqlx::query(
            "SELECT gp.player_id, u.name, gp.score
             FROM game_players gp JOIN users u ON gp.player_id = u.id
             WHERE gp.game_id = ?
             ORDER BY gp.score DESC",
        )
        .bind(game_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| StorageError::backend("querying game roster", err))?;

        rows.iter()
            .map(|row| {
                Ok(GamePlayerEntity {
                    player_id: get(row, "player_id")?,
                    name: get(row, "name")?,
                    score: get(row, "score")?,
                })
            })
            .collect()
    }

    fn game_from_row(row: &SqliteRow, players: Vec<GamePlayerEntity>) -> StorageResult<GameEntity> {
        let status = match get::<String>(row, "status")?.as_str() {
            "ended" => GameStatus::Ended,
            _ => GameStatus::Active,
        };
        Ok(GameEntity {
            id: get(row, "id")?,
            name: get(row, "name")?,
            template_id: get(row, "template_id")?,
            template_name: get(row, "template_name")?,
            base_points: get(row, "base_points")?,
            status,
            created_at: get(row, "created_at")?,
            ended_at: get::<Option<DateTime<Utc>>>(row, "ended_at")?,
            players,
        })
    }

    /// The game's status together with its effective base points, used by the
    /// roster mutations.
    async fn game_status_and_base(&self, game_id: i64) -> StorageResult<(GameStatus, i64)> {
        let row = sqlx::query(
            "SELECT g.status, t.base_points
             FROM games g LEFT JOIN templates t ON g.template_id = t.id
             WHERE g.id = ?",
        )
        .bind(game_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::backend("querying game status", err))?
        .ok_or_else(|| StorageError::not_found("game", game_id))?;

        let status = match get::<String>(&row, "status")?.as_str() {
            "ended" => GameStatus::Ended,
            _ => GameStatus::Active,
        };
        // Dangling template: participants start from zero.
        let base_points = get::<Option<i64>>(&row, "base_points")?.unwrap_or(0);
        Ok((status, base_points))
    }
}

/// Map an insert failure, turning a UNIQUE-constraint violation into the
/// domain duplicate error. The constraint is the authority here, so a
/// concurrent duplicate degrades to the same conflict as a sequential one.
fn insert_error(
    entity: &'static str,
    detail: String,
    context: &'static str,
) -> impl FnOnce(sqlx::Error) -> StorageError {
    move |err| match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StorageError::already_exists(entity, detail)
        }
        _ => StorageError::backend(context, err),
    }
}

fn get<'r, T>(row: &'r SqliteRow, column: &str) -> StorageResult<T>
where
    T: sqlx::Decode<'r, Sqlite> + sqlx::Type<Sqlite>,
{
    row.try_get(column)
        .map_err(|err| StorageError::backend(format!("decoding column `{column}`"), err))
}

fn role_from_str(value: &str) -> Role {
    match value {
        "admin" => Role::Admin,
        _ => Role::Player,
    }
}

impl ScoreStore for SqliteScoreStore {
    fn list_players(&self) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let rows = sqlx::query("SELECT * FROM users ORDER BY name")
                .fetch_all(&store.pool)
                .await
                .map_err(|err| StorageError::backend("listing players", err))?;
            rows.iter().map(Self::player_from_row).collect()
        })
    }

    fn find_player(&self, id: i64) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.fetch_player(id).await })
    }

    fn find_credentials(
        &self,
        email: String,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerCredentials>>> {
        let store = self.clone();
        Box::pin(async move {
            let row = sqlx::query("SELECT * FROM users WHERE email = ?")
                .bind(&email)
                .fetch_optional(&store.pool)
                .await
                .map_err(|err| StorageError::backend("querying credentials", err))?;

            row.as_ref()
                .map(|row| {
                    Ok(PlayerCredentials {
                        player: Self::player_from_row(row)?,
                        password_hash: get(row, "password")?,
                    })
                })
                .transpose()
        })
    }

    fn create_player(
        &self,
        player: NewPlayer,
    ) -> BoxFuture<'static, StorageResult<PlayerEntity>> {
        let store = self.clone();
        Box::pin(async move {
            // The email UNIQUE constraint is the sole uniqueness check.
            let result = sqlx::query(
                "INSERT INTO users (name, email, password, role, created_at) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(&player.name)
            .bind(&player.email)
            .bind(&player.password_hash)
            .bind(player.role.as_str())
            .bind(Utc::now())
            .execute(&store.pool)
            .await
            .map_err(insert_error(
                "player",
                format!("email `{}` is already registered", player.email),
                "inserting player",
            ))?;

            store
                .fetch_player(result.last_insert_rowid())
                .await?
                .ok_or_else(|| StorageError::not_found("player", result.last_insert_rowid()))
        })
    }

    fn update_player(
        &self,
        id: i64,
        patch: PlayerPatch,
    ) -> BoxFuture<'static, StorageResult<PlayerEntity>> {
        let store = self.clone();
        Box::pin(async move {
            if store.fetch_player(id).await?.is_none() {
                return Err(StorageError::not_found("player", id));
            }

            if let Some(name) = &patch.name {
                sqlx::query("UPDATE users SET name = ? WHERE id = ?")
                    .bind(name)
                    .bind(id)
                    .execute(&store.pool)
                    .await
                    .map_err(|err| StorageError::backend("updating player name", err))?;
            }
            if let Some(hash) = &patch.password_hash {
                sqlx::query("UPDATE users SET password = ? WHERE id = ?")
                    .bind(hash)
                    .bind(id)
                    .execute(&store.pool)
                    .await
                    .map_err(|err| StorageError::backend("updating player password", err))?;
            }

            store
                .fetch_player(id)
                .await?
                .ok_or_else(|| StorageError::not_found("player", id))
        })
    }

    fn delete_player(&self, id: i64) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            if store.fetch_player(id).await?.is_none() {
                return Err(StorageError::not_found("player", id));
            }

            // Roster rows go first so no dangling references survive.
            let mut tx = store
                .pool
                .begin()
                .await
                .map_err(|err| StorageError::backend("starting transaction", err))?;
            sqlx::query("DELETE FROM game_players WHERE player_id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(|err| StorageError::backend("cascading roster rows", err))?;
            sqlx::query("DELETE FROM users WHERE id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(|err| StorageError::backend("deleting player", err))?;
            tx.commit()
                .await
                .map_err(|err| StorageError::backend("committing delete", err))?;
            Ok(())
        })
    }

    fn list_templates(&self) -> BoxFuture<'static, StorageResult<Vec<TemplateEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let rows = sqlx::query("SELECT * FROM templates ORDER BY name")
                .fetch_all(&store.pool)
                .await
                .map_err(|err| StorageError::backend("listing templates", err))?;
            rows.iter().map(Self::template_from_row).collect()
        })
    }

    fn find_template(&self, id: i64) -> BoxFuture<'static, StorageResult<Option<TemplateEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let row = sqlx::query("SELECT * FROM templates WHERE id = ?")
                .bind(id)
                .fetch_optional(&store.pool)
                .await
                .map_err(|err| StorageError::backend("querying template", err))?;
            row.as_ref().map(Self::template_from_row).transpose()
        })
    }

    fn create_template(
        &self,
        template: NewTemplate,
    ) -> BoxFuture<'static, StorageResult<TemplateEntity>> {
        let store = self.clone();
        Box::pin(async move {
            let result =
                sqlx::query("INSERT INTO templates (name, base_points, created_at) VALUES (?, ?, ?)")
                    .bind(&template.name)
                    .bind(template.base_points)
                    .bind(Utc::now())
                    .execute(&store.pool)
                    .await
                    .map_err(|err| StorageError::backend("inserting template", err))?;

            let id = result.last_insert_rowid();
            let row = sqlx::query("SELECT * FROM templates WHERE id = ?")
                .bind(id)
                .fetch_one(&store.pool)
                .await
                .map_err(|err| StorageError::backend("reading back template", err))?;
            Self::template_from_row(&row)
        })
    }

    fn update_template(
        &self,
        id: i64,
        template: NewTemplate,
    ) -> BoxFuture<'static, StorageResult<TemplateEntity>> {
        let store = self.clone();
        Box::pin(async move {
            let result = sqlx::query("UPDATE templates SET name = ?, base_points = ? WHERE id = ?")
                .bind(&template.name)
                .bind(template.base_points)
                .bind(id)
                .execute(&store.pool)
                .await
                .map_err(|err| StorageError::backend("updating template", err))?;
            if result.rows_affected() == 0 {
                return Err(StorageError::not_found("template", id));
            }

            let row = sqlx::query("SELECT * FROM templates WHERE id = ?")
                .bind(id)
                .fetch_one(&store.pool)
                .await
                .map_err(|err| StorageError::backend("reading back template", err))?;
            Self::template_from_row(&row)
        })
    }

    fn delete_template(&self, id: i64) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            // Idempotent: deleting an unknown id is a no-op, and games keep
            // their (now dangling) template reference.
            sqlx::query("DELETE FROM templates WHERE id = ?")
                .bind(id)
                .execute(&store.pool)
                .await
                .map_err(|err| StorageError::backend("deleting template", err))?;
            Ok(())
        })
    }

    fn list_games(&self) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let rows = sqlx::query(
                "SELECT g.*, t.name AS template_name, t.base_points AS base_points
                 FROM games g LEFT JOIN templates t ON g.template_id = t.id
                 ORDER BY g.created_at DESC",
            )
            .fetch_all(&store.pool)
            .await
            .map_err(|err| StorageError::backend("listing games", err))?;

            let mut games = Vec::with_capacity(rows.len());
            for row in &rows {
                let id: i64 = get(row, "id")?;
                let players = store.fetch_roster(id).await?;
                games.push(Self::game_from_row(row, players)?);
            }
            Ok(games)
        })
    }

    fn find_game(&self, id: i64) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.fetch_game(id).await })
    }

    fn create_game(&self, game: NewGame) -> BoxFuture<'static, StorageResult<GameEntity>> {
        let store = self.clone();
        Box::pin(async move {
            let template_row = sqlx::query("SELECT base_points FROM templates WHERE id = ?")
                .bind(game.template_id)
                .fetch_optional(&store.pool)
                .await
                .map_err(|err| StorageError::backend("querying template", err))?
                .ok_or_else(|| StorageError::not_found("template", game.template_id))?;
            let base_points: i64 = get(&template_row, "base_points")?;

            for (seat, player_id) in game.player_ids.iter().enumerate() {
                if game.player_ids[..seat].contains(player_id) {
                    return Err(StorageError::already_exists(
                        "game player",
                        format!("player {player_id} appears twice in the initial roster"),
                    ));
                }
                if store.fetch_player(*player_id).await?.is_none() {
                    return Err(StorageError::not_found("player", *player_id));
                }
            }

            // Game row and initial roster land together or not at all.
            let mut tx = store
                .pool
                .begin()
                .await
                .map_err(|err| StorageError::backend("starting transaction", err))?;
            let result = sqlx::query(
                "INSERT INTO games (name, template_id, status, created_at) VALUES (?, ?, ?, ?)",
            )
            .bind(&game.name)
            .bind(game.template_id)
            .bind(GameStatus::Active.as_str())
            .bind(Utc::now())
            .execute(&mut *tx)
            .await
            .map_err(|err| StorageError::backend("inserting game", err))?;
            let game_id = result.last_insert_rowid();

            for player_id in &game.player_ids {
                sqlx::query(
                    "INSERT INTO game_players (game_id, player_id, score) VALUES (?, ?, ?)",
                )
                .bind(game_id)
                .bind(player_id)
                .bind(base_points)
                .execute(&mut *tx)
                .await
                .map_err(insert_error(
                    "game player",
                    format!("player {player_id} is already in game {game_id}"),
                    "seating initial roster",
                ))?;
            }
            tx.commit()
                .await
                .map_err(|err| StorageError::backend("committing game creation", err))?;

            store
                .fetch_game(game_id)
                .await?
                .ok_or_else(|| StorageError::not_found("game", game_id))
        })
    }

    fn add_game_player(
        &self,
        game_id: i64,
        player_id: i64,
    ) -> BoxFuture<'static, StorageResult<GameEntity>> {
        let store = self.clone();
        Box::pin(async move {
            let (status, base_points) = store.game_status_and_base(game_id).await?;
            if status != GameStatus::Active {
                return Err(StorageError::InvalidState(
                    "cannot add players to an ended game".into(),
                ));
            }
            if store.fetch_player(player_id).await?.is_none() {
                return Err(StorageError::not_found("player", player_id));
            }

            // The (game_id, player_id) UNIQUE constraint rejects a second seat.
            sqlx::query("INSERT INTO game_players (game_id, player_id, score) VALUES (?, ?, ?)")
                .bind(game_id)
                .bind(player_id)
                .bind(base_points)
                .execute(&store.pool)
                .await
                .map_err(insert_error(
                    "game player",
                    format!("player {player_id} is already in game {game_id}"),
                    "seating player",
                ))?;

            store
                .fetch_game(game_id)
                .await?
                .ok_or_else(|| StorageError::not_found("game", game_id))
        })
    }

    fn set_score(
        &self,
        game_id: i64,
        player_id: i64,
        score: i64,
    ) -> BoxFuture<'static, StorageResult<GameEntity>> {
        let store = self.clone();
        Box::pin(async move {
            let (status, _) = store.game_status_and_base(game_id).await?;
            if status != GameStatus::Active {
                return Err(StorageError::InvalidState(
                    "cannot update scores in an ended game".into(),
                ));
            }

            let result =
                sqlx::query("UPDATE game_players SET score = ? WHERE game_id = ? AND player_id = ?")
                    .bind(score)
                    .bind(game_id)
                    .bind(player_id)
                    .execute(&store.pool)
                    .await
                    .map_err(|err| StorageError::backend("updating score", err))?;
            if result.rows_affected() == 0 {
                return Err(StorageError::not_found("game player", player_id));
            }

            store
                .fetch_game(game_id)
                .await?
                .ok_or_else(|| StorageError::not_found("game", game_id))
        })
    }

    fn end_game(&self, game_id: i64) -> BoxFuture<'static, StorageResult<GameEntity>> {
        let store = self.clone();
        Box::pin(async move {
            let (status, _) = store.game_status_and_base(game_id).await?;
            if status != GameStatus::Active {
                return Err(StorageError::InvalidState("game is already ended".into()));
            }

            sqlx::query("UPDATE games SET status = ?, ended_at = ? WHERE id = ?")
                .bind(GameStatus::Ended.as_str())
                .bind(Utc::now())
                .bind(game_id)
                .execute(&store.pool)
                .await
                .map_err(|err| StorageError::backend("ending game", err))?;

            store
                .fetch_game(game_id)
                .await?
                .ok_or_else(|| StorageError::not_found("game", game_id))
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            sqlx::query("SELECT 1")
                .fetch_one(&store.pool)
                .await
                .map_err(|err| StorageError::unavailable("sqlite health check", err))?;
            Ok(())
        })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            // The pool re-establishes connections on demand; a probe suffices.
            sqlx::query("SELECT 1")
                .fetch_one(&store.pool)
                .await
                .map_err(|err| StorageError::unavailable("sqlite reconnect probe", err))?;
            Ok(())
        })
    }
}
