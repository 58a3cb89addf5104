use std::sync::Arc;

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use chrono::Utc;
use futures::future::BoxFuture;
use reqwest::{Client, Method, StatusCode};
use serde::{Deserialize, Serialize};

use crate::dao::{
    models::{
        GameEntity, NewGame, NewPlayer, NewTemplate, PlayerCredentials, PlayerEntity, PlayerPatch,
        TemplateEntity,
    },
    score_store::ScoreStore,
    storage::StorageResult,
};

use super::{
    config::GithubConfig,
    document::DbDocument,
    error::{GithubDaoError, GithubResult},
};

/// Shape of a successful `GET /repos/{owner}/{repo}/contents/{path}` reply.
#[derive(Deserialize)]
struct ContentsResponse {
    /// Base64 file body, wrapped with newlines by the API.
    content: String,
    /// Current blob sha of the file.
    sha: String,
}

/// Shape of a successful PUT reply; only the new blob sha matters.
#[derive(Deserialize)]
struct PutResponse {
    content: PutContent,
}

#[derive(Deserialize)]
struct PutContent {
    sha: String,
}

/// Request body for the contents PUT endpoint.
#[derive(Serialize)]
struct PutBody<'a> {
    message: String,
    content: String,
    /// Prior blob sha; omitted when creating the file.
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

/// [`ScoreStore`] keeping the whole database as one JSON file in a GitHub
/// repository. Every operation is a fresh read of the document; mutations
/// write the modified document back guarded by the blob sha they read, so a
/// concurrent writer surfaces as a conflict instead of being overwritten.
#[derive(Clone)]
pub struct GithubScoreStore {
    client: Client,
    config: Arc<GithubConfig>,
}

impl GithubScoreStore {
    /// Build the HTTP client and ensure the database document exists,
    /// creating a seeded one when the repository does not have it yet.
    pub async fn connect(config: GithubConfig) -> GithubResult<Self> {
        let client = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|source| GithubDaoError::ClientBuilder { source })?;

        let store = Self {
            client,
            config: Arc::new(config),
        };

        store.ensure_document().await?;
        Ok(store)
    }

    fn contents_url(&self) -> String {
        let c = &self.config;
        format!(
            "{}/repos/{}/{}/contents/{}",
            c.api_base, c.owner, c.repo, c.data_path
        )
    }

    fn request(&self, method: Method) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, self.contents_url())
            .header("Accept", "application/vnd.github+json");
        match self.config.token.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Fetch the current document and its blob sha. A missing file yields the
    /// seeded default with no sha, which a later write will create.
    async fn load(&self) -> GithubResult<(DbDocument, Option<String>)> {
        let path = self.config.data_path.clone();
        let response = self
            .request(Method::GET)
            .send()
            .await
            .map_err(|source| GithubDaoError::RequestSend {
                path: path.clone(),
                source,
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                let seeded = DbDocument::seed()
                    .map_err(|source| GithubDaoError::SeedDocument { source })?;
                Ok((seeded, None))
            }
            status if status.is_success() => {
                let payload = response.json::<ContentsResponse>().await.map_err(|source| {
                    GithubDaoError::DecodeResponse {
                        path: path.clone(),
                        source,
                    }
                })?;

                // The API wraps the base64 body across lines.
                let compact: String = payload
                    .content
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect();
                let bytes = BASE64.decode(compact).map_err(|source| {
                    GithubDaoError::DecodeContent {
                        path: path.clone(),
                        source,
                    }
                })?;
                let document = serde_json::from_slice(&bytes).map_err(|source| {
                    GithubDaoError::DeserializeDocument {
                        path: path.clone(),
                        source,
                    }
                })?;
                Ok((document, Some(payload.sha)))
            }
            other => Err(GithubDaoError::RequestStatus { path, status: other }),
        }
    }

    /// Replace the whole document, carrying the sha it was read at. GitHub
    /// rejects the write when the file moved on since that read; that
    /// rejection is surfaced as a stale write rather than retried blindly.
    async fn save(&self, document: &DbDocument, sha: Option<&str>) -> GithubResult<String> {
        if self.config.token.is_none() {
            return Err(GithubDaoError::MissingToken);
        }

        let path = self.config.data_path.clone();
        let json = serde_json::to_vec_pretty(document).expect("document serializes");
        let body = PutBody {
            message: format!("Update database - {}", Utc::now().to_rfc3339()),
            content: BASE64.encode(json),
            sha,
        };

        let response = self
            .request(Method::PUT)
            .json(&body)
            .send()
            .await
            .map_err(|source| GithubDaoError::RequestSend {
                path: path.clone(),
                source,
            })?;

        match response.status() {
            // 409 is a sha mismatch, 422 the create/update mode mismatch when
            // the file appeared or vanished since our read.
            StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                Err(GithubDaoError::StaleWrite { path })
            }
            status if status.is_success() => {
                let payload = response.json::<PutResponse>().await.map_err(|source| {
                    GithubDaoError::DecodeResponse { path, source }
                })?;
                Ok(payload.content.sha)
            }
            other => Err(GithubDaoError::RequestStatus { path, status: other }),
        }
    }

    /// Create the seeded document when the repository does not hold one yet.
    async fn ensure_document(&self) -> GithubResult<()> {
        let (document, sha) = self.load().await?;
        if sha.is_none() {
            self.save(&document, None).await?;
        }
        Ok(())
    }

    /// Read-modify-write cycle shared by every mutation: fetch the current
    /// document, apply the pure mutation, write the result back under the
    /// fetched sha. Integrity failures abort before anything goes on the wire.
    async fn commit<T, F>(&self, mutate: F) -> StorageResult<T>
    where
        F: FnOnce(&mut DbDocument) -> StorageResult<T>,
    {
        let (mut document, sha) = self.load().await?;
        let value = mutate(&mut document)?;
        self.save(&document, sha.as_deref()).await?;
        Ok(value)
    }

    async fn view<T, F>(&self, project: F) -> StorageResult<T>
    where
        F: FnOnce(&DbDocument) -> T,
    {
        let (document, _) = self.load().await?;
        Ok(project(&document))
    }
}

impl ScoreStore for GithubScoreStore {
    fn list_players(&self) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.view(|doc| doc.list_players()).await })
    }

    fn find_player(&self, id: i64) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.view(|doc| doc.find_player(id)).await })
    }

    fn find_credentials(
        &self,
        email: String,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerCredentials>>> {
        let store = self.clone();
        Box::pin(async move { store.view(|doc| doc.find_credentials(&email)).await })
    }

    fn create_player(&self, player: NewPlayer) -> BoxFuture<'static, StorageResult<PlayerEntity>> {
        let store = self.clone();
        Box::pin(async move { store.commit(|doc| doc.create_player(player)).await })
    }

    fn update_player(
        &self,
        id: i64,
        patch: PlayerPatch,
    ) -> BoxFuture<'static, StorageResult<PlayerEntity>> {
        let store = self.clone();
        Box::pin(async move { store.commit(|doc| doc.update_player(id, patch)).await })
    }

    fn delete_player(&self, id: i64) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.commit(|doc| doc.delete_player(id)).await })
    }

    fn list_templates(&self) -> BoxFuture<'static, StorageResult<Vec<TemplateEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.view(|doc| doc.list_templates()).await })
    }

    fn find_template(&self, id: i64) -> BoxFuture<'static, StorageResult<Option<TemplateEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.view(|doc| doc.find_template(id)).await })
    }

    fn create_template(
        &self,
        template: NewTemplate,
    ) -> BoxFuture<'static, StorageResult<TemplateEntity>> {
        let store = self.clone();
        Box::pin(async move { store.commit(|doc| doc.create_template(template)).await })
    }

    fn update_template(
        &self,
        id: i64,
        template: NewTemplate,
    ) -> BoxFuture<'static, StorageResult<TemplateEntity>> {
        let store = self.clone();
        Box::pin(async move { store.commit(|doc| doc.update_template(id, template)).await })
    }

    fn delete_template(&self, id: i64) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .commit(|doc| {
                    doc.delete_template(id);
                    Ok(())
                })
                .await
        })
    }

    fn list_games(&self) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.view(|doc| doc.list_games()).await })
    }

    fn find_game(&self, id: i64) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.view(|doc| doc.find_game(id)).await })
    }

    fn create_game(&self, game: NewGame) -> BoxFuture<'static, StorageResult<GameEntity>> {
        let store = self.clone();
        Box::pin(async move { store.commit(|doc| doc.create_game(game)).await })
    }

    fn add_game_player(
        &self,
        game_id: i64,
        player_id: i64,
    ) -> BoxFuture<'static, StorageResult<GameEntity>> {
        let store = self.clone();
        Box::pin(async move { store.commit(|doc| doc.add_game_player(game_id, player_id)).await })
    }

    fn set_score(
        &self,
        game_id: i64,
        player_id: i64,
        score: i64,
    ) -> BoxFuture<'static, StorageResult<GameEntity>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .commit(|doc| doc.set_score(game_id, player_id, score))
                .await
        })
    }

    fn end_game(&self, game_id: i64) -> BoxFuture<'static, StorageResult<GameEntity>> {
        let store = self.clone();
        Box::pin(async move { store.commit(|doc| doc.end_game(game_id)).await })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let path = store.config.data_path.clone();
            let response = store
                .request(Method::GET)
                .send()
                .await
                .map_err(|source| GithubDaoError::RequestSend {
                    path: path.clone(),
                    source,
                })?;

            // A missing file is still a reachable backend; the next write
            // recreates it.
            match response.status() {
                StatusCode::NOT_FOUND => Ok(()),
                status if status.is_success() => Ok(()),
                other => Err(GithubDaoError::RequestStatus { path, status: other }.into()),
            }
        })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ensure_document().await.map_err(Into::into) })
    }
}
