//! Shared application state: the installed store and the degraded flag.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{dao::score_store::ScoreStore, error::ServiceError};

/// Cheaply cloneable handle to the application state.
pub type SharedState = Arc<AppState>;

/// Central application state holding the storage backend handle.
///
/// The application starts in degraded mode until the supervisor installs a
/// backend; data routes answer 503 until then.
pub struct AppState {
    store: RwLock<Option<Arc<dyn ScoreStore>>>,
    degraded: RwLock<bool>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new() -> SharedState {
        Arc::new(Self {
            store: RwLock::new(None),
            degraded: RwLock::new(true),
        })
    }

    /// Obtain a handle to the current store, if one is installed.
    pub async fn score_store(&self) -> Option<Arc<dyn ScoreStore>> {
        let guard = self.store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the current store or fail with [`ServiceError::Degraded`].
    pub async fn require_score_store(&self) -> Result<Arc<dyn ScoreStore>, ServiceError> {
        self.score_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a store implementation and leave degraded mode.
    pub async fn install_score_store(&self, store: Arc<dyn ScoreStore>) {
        {
            let mut guard = self.store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false).await;
    }

    /// Current degraded flag.
    pub async fn is_degraded(&self) -> bool {
        *self.degraded.read().await
    }

    /// Flip the degraded flag; the supervisor toggles this on health changes.
    pub async fn update_degraded(&self, value: bool) {
        let mut guard = self.degraded.write().await;
        *guard = value;
    }
}
