#[cfg(feature = "github-store")]
pub mod github;
#[cfg(feature = "sqlite-store")]
pub mod sqlite;

use futures::future::BoxFuture;

use crate::dao::models::{
    GameEntity, NewGame, NewPlayer, NewTemplate, PlayerCredentials, PlayerEntity, PlayerPatch,
    TemplateEntity,
};
use crate::dao::storage::StorageResult;

/// Abstraction over the persistence layer for players, templates and games.
///
/// Both backends honour the same integrity rules: roster rows always reference
/// existing players and games, `(game, player)` pairs are unique, scores and
/// rosters only change while a game is active, and deleting a player removes
/// their roster rows everywhere.
pub trait ScoreStore: Send + Sync {
    /// All player accounts ordered by name, without password material.
    fn list_players(&self) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>>;
    /// Look up one player account by id.
    fn find_player(&self, id: i64) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>>;
    /// Look up login credentials by email. Only the login path may call this.
    fn find_credentials(
        &self,
        email: String,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerCredentials>>>;
    /// Create a player account; fails with `AlreadyExists` on a duplicate email.
    fn create_player(&self, player: NewPlayer)
    -> BoxFuture<'static, StorageResult<PlayerEntity>>;
    /// Patch the provided fields of a player account.
    fn update_player(
        &self,
        id: i64,
        patch: PlayerPatch,
    ) -> BoxFuture<'static, StorageResult<PlayerEntity>>;
    /// Delete a player account and cascade-remove their roster rows across all
    /// games. The admin-role guard lives in the service layer.
    fn delete_player(&self, id: i64) -> BoxFuture<'static, StorageResult<()>>;

    /// All templates ordered by name.
    fn list_templates(&self) -> BoxFuture<'static, StorageResult<Vec<TemplateEntity>>>;
    /// Look up one template by id.
    fn find_template(&self, id: i64) -> BoxFuture<'static, StorageResult<Option<TemplateEntity>>>;
    /// Create a template.
    fn create_template(
        &self,
        template: NewTemplate,
    ) -> BoxFuture<'static, StorageResult<TemplateEntity>>;
    /// Replace both fields of a template.
    fn update_template(
        &self,
        id: i64,
        template: NewTemplate,
    ) -> BoxFuture<'static, StorageResult<TemplateEntity>>;
    /// Delete a template; silently succeeds when the id does not exist. Games
    /// referencing the template keep a dangling `template_id`.
    fn delete_template(&self, id: i64) -> BoxFuture<'static, StorageResult<()>>;

    /// All games ordered by creation time descending, template joined in and
    /// rosters ordered by score descending.
    fn list_games(&self) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>>;
    /// Look up one game with its joined template and ordered roster.
    fn find_game(&self, id: i64) -> BoxFuture<'static, StorageResult<Option<GameEntity>>>;
    /// Create an active game, seating the initial roster at the template's
    /// base points. Fails with `NotFound` when the template does not resolve.
    fn create_game(&self, game: NewGame) -> BoxFuture<'static, StorageResult<GameEntity>>;
    /// Seat one more player in an active game at the template base points
    /// (0 when the template is gone).
    fn add_game_player(
        &self,
        game_id: i64,
        player_id: i64,
    ) -> BoxFuture<'static, StorageResult<GameEntity>>;
    /// Overwrite a participant's score in an active game.
    fn set_score(
        &self,
        game_id: i64,
        player_id: i64,
        score: i64,
    ) -> BoxFuture<'static, StorageResult<GameEntity>>;
    /// Transition a game from active to ended, setting `ended_at` exactly
    /// once. A second call fails with `InvalidState`.
    fn end_game(&self, game_id: i64) -> BoxFuture<'static, StorageResult<GameEntity>>;

    /// Cheap connectivity probe used by the storage supervisor.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Attempt to re-establish connectivity after a failed health check.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
