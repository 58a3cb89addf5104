//! Error types shared by the GitHub document storage implementation.

use reqwest::StatusCode;
use thiserror::Error;

use crate::dao::storage::StorageError;

/// Convenient result alias returning [`GithubDaoError`] failures.
pub type GithubResult<T> = Result<T, GithubDaoError>;

/// Failures that can occur while moving the database document over the wire.
#[derive(Debug, Error)]
pub enum GithubDaoError {
    /// Required environment variable is missing.
    #[error("missing GitHub environment variable `{var}`")]
    MissingEnvVar {
        /// Name of the missing variable.
        var: &'static str,
    },
    /// Writes require a token; none was configured.
    #[error("no GitHub token configured; writes are not possible")]
    MissingToken,
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build GitHub client")]
    ClientBuilder {
        /// Underlying reqwest failure.
        #[source]
        source: reqwest::Error,
    },
    /// A request to the contents endpoint could not be sent.
    #[error("failed to send GitHub request to `{path}`")]
    RequestSend {
        /// Repository path of the document.
        path: String,
        /// Underlying reqwest failure.
        #[source]
        source: reqwest::Error,
    },
    /// GitHub returned an unexpected status code.
    #[error("unexpected GitHub response status {status} for `{path}`")]
    RequestStatus {
        /// Repository path of the document.
        path: String,
        /// Status code received.
        status: StatusCode,
    },
    /// GitHub rejected the write because the carried blob sha is stale.
    #[error("stale document write rejected for `{path}`")]
    StaleWrite {
        /// Repository path of the document.
        path: String,
    },
    /// Response payload could not be parsed.
    #[error("failed to decode GitHub response for `{path}`")]
    DecodeResponse {
        /// Repository path of the document.
        path: String,
        /// Underlying reqwest failure.
        #[source]
        source: reqwest::Error,
    },
    /// The base64 file content could not be decoded.
    #[error("invalid base64 content for `{path}`")]
    DecodeContent {
        /// Repository path of the document.
        path: String,
        /// Underlying base64 failure.
        #[source]
        source: base64::DecodeError,
    },
    /// Seeding the default document failed while hashing the admin password.
    #[error("failed to seed default database document")]
    SeedDocument {
        /// Underlying bcrypt failure.
        #[source]
        source: bcrypt::BcryptError,
    },
    /// The decoded file is not a valid database document.
    #[error("failed to deserialize database document at `{path}`")]
    DeserializeDocument {
        /// Repository path of the document.
        path: String,
        /// Underlying serde failure.
        #[source]
        source: serde_json::Error,
    },
}

impl From<GithubDaoError> for StorageError {
    fn from(err: GithubDaoError) -> Self {
        match err {
            GithubDaoError::StaleWrite { path } => StorageError::Conflict(format!(
                "document `{path}` changed under a concurrent writer"
            )),
            GithubDaoError::RequestSend { .. } | GithubDaoError::ClientBuilder { .. } => {
                let message = err.to_string();
                StorageError::Unavailable {
                    message,
                    source: Box::new(err),
                }
            }
            other => {
                let message = other.to_string();
                StorageError::Backend {
                    message,
                    source: Box::new(other),
                }
            }
        }
    }
}
