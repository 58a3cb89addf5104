use super::error::{GithubDaoError, GithubResult};

/// Default API base for github.com; overridable for GitHub Enterprise hosts.
const DEFAULT_API_BASE: &str = "https://api.github.com";
/// Default repository path of the database document.
const DEFAULT_DATA_PATH: &str = "data/db.json";

/// Runtime configuration describing where the database document lives.
#[derive(Debug, Clone)]
pub struct GithubConfig {
    /// API base URL without a trailing slash.
    pub api_base: String,
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Path of the JSON document inside the repository.
    pub data_path: String,
    /// Token used for writes; reads work unauthenticated on public repos.
    pub token: Option<String>,
}

impl GithubConfig {
    /// Construct a configuration for an explicit repository.
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.into(),
            owner: owner.into(),
            repo: repo.into(),
            data_path: DEFAULT_DATA_PATH.into(),
            token: None,
        }
    }

    /// Attach the token used for authenticated writes.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Build a configuration by reading the expected environment variables.
    pub fn from_env() -> GithubResult<Self> {
        let owner = std::env::var("POKER_GITHUB_OWNER")
            .map_err(|_| GithubDaoError::MissingEnvVar { var: "POKER_GITHUB_OWNER" })?;
        let repo = std::env::var("POKER_GITHUB_REPO")
            .map_err(|_| GithubDaoError::MissingEnvVar { var: "POKER_GITHUB_REPO" })?;

        let mut config = Self::new(owner, repo);

        if let Ok(base) = std::env::var("POKER_GITHUB_API_BASE") {
            config.api_base = base.trim_end_matches('/').to_string();
        }
        if let Ok(path) = std::env::var("POKER_GITHUB_DATA_PATH") {
            config.data_path = path;
        }
        if let Ok(token) = std::env::var("POKER_GITHUB_TOKEN") {
            config = config.with_token(token);
        }

        Ok(config)
    }
}
