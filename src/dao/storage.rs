use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of the underlying engine.
///
/// Both backends enforce the same integrity rules, so domain outcomes such as
/// a duplicate roster entry surface here rather than leaking engine errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A referenced entity does not exist.
    #[error("{entity} `{id}` not found")]
    NotFound {
        /// Entity kind, e.g. "game" or "player".
        entity: &'static str,
        /// Identifier that failed to resolve.
        id: String,
    },
    /// A uniqueness rule was violated.
    #[error("{entity} already exists: {detail}")]
    AlreadyExists {
        /// Entity kind carrying the unique key.
        entity: &'static str,
        /// Which key collided.
        detail: String,
    },
    /// The operation is not permitted in the entity's current lifecycle state.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// A whole-document write raced another writer and was rejected by the
    /// remote stale-state guard.
    #[error("conflicting concurrent write: {0}")]
    Conflict(String),
    /// Storage backend is unreachable.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Human readable context.
        message: String,
        /// Underlying transport or engine failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// Unexpected backend failure that maps to an internal error upstream.
    #[error("storage backend error: {message}")]
    Backend {
        /// Human readable context.
        message: String,
        /// Underlying engine failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl StorageError {
    /// Construct a not-found error for the given entity kind and id.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        StorageError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Construct a uniqueness-violation error.
    pub fn already_exists(entity: &'static str, detail: impl Into<String>) -> Self {
        StorageError::AlreadyExists {
            entity,
            detail: detail.into(),
        }
    }

    /// Construct an unavailable error from any transport failure.
    pub fn unavailable(message: impl Into<String>, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message: message.into(),
            source: Box::new(source),
        }
    }

    /// Construct a backend error from any engine failure.
    pub fn backend(message: impl Into<String>, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Backend {
            message: message.into(),
            source: Box::new(source),
        }
    }
}
