//! Keeps the configured storage backend connected, flipping the shared
//! degraded flag while it is unreachable so routes answer 503 instead of
//! timing out.

use std::{future::Future, sync::Arc, time::Duration};

use tokio::time::sleep;
use tracing::{info, warn};

use crate::{
    dao::{score_store::ScoreStore, storage::StorageError},
    state::SharedState,
};

/// Backoff and polling knobs for the supervision loop.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// First wait after a failed connect or reconnect attempt.
    pub initial_backoff: Duration,
    /// Backoff doubles up to this ceiling.
    pub max_backoff: Duration,
    /// Pause between health probes while the backend is healthy.
    pub poll_interval: Duration,
    /// Reconnect attempts before a store handle is dropped for good.
    pub reconnect_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(10),
            poll_interval: Duration::from_secs(5),
            reconnect_attempts: 3,
        }
    }
}

impl RetryPolicy {
    fn grow(&self, backoff: Duration) -> Duration {
        (backoff * 2).min(self.max_backoff)
    }
}

/// Connect the backend and keep it healthy under the default policy.
pub async fn run<F, Fut>(state: SharedState, connect: F)
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Arc<dyn ScoreStore>, StorageError>> + Send,
{
    run_with_policy(state, connect, RetryPolicy::default()).await
}

/// Connect the backend and keep it healthy, re-entering degraded mode
/// whenever connectivity is lost. Returns only if the tokio runtime stops.
pub async fn run_with_policy<F, Fut>(state: SharedState, mut connect: F, policy: RetryPolicy)
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Arc<dyn ScoreStore>, StorageError>> + Send,
{
    let mut backoff = policy.initial_backoff;

    loop {
        match connect().await {
            Ok(store) => {
                state.install_score_store(store.clone()).await;
                info!("storage backend installed");
                backoff = policy.initial_backoff;
                // Comes back only when the handle is beyond recovery; fall
                // through to a fresh connect.
                watch(&state, store, &policy).await;
            }
            Err(err) => warn!(error = %err, "storage connect failed"),
        }
        sleep(backoff).await;
        backoff = policy.grow(backoff);
    }
}

/// Probe the installed store until its connectivity cannot be recovered.
async fn watch(state: &SharedState, store: Arc<dyn ScoreStore>, policy: &RetryPolicy) {
    loop {
        if store.health_check().await.is_ok() {
            if state.is_degraded().await {
                info!("storage healthy again; leaving degraded mode");
                state.update_degraded(false).await;
            }
            sleep(policy.poll_interval).await;
            continue;
        }

        warn!("storage health probe failed; entering degraded mode");
        state.update_degraded(true).await;

        if recover(store.as_ref(), policy).await {
            info!("storage recovered; leaving degraded mode");
            state.update_degraded(false).await;
        } else {
            warn!("storage reconnect attempts exhausted; dropping the handle");
            return;
        }
    }
}

/// Drive `try_reconnect` with exponential backoff until it succeeds or the
/// attempt budget runs out.
async fn recover(store: &dyn ScoreStore, policy: &RetryPolicy) -> bool {
    let mut backoff = policy.initial_backoff;

    for attempt in 1..=policy.reconnect_attempts {
        match store.try_reconnect().await {
            Ok(()) => return true,
            Err(err) => {
                warn!(attempt, error = %err, "storage reconnect attempt failed");
                sleep(backoff).await;
                backoff = policy.grow(backoff);
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_up_to_the_ceiling() {
        let policy = RetryPolicy::default();
        let mut backoff = policy.initial_backoff;

        backoff = policy.grow(backoff);
        assert_eq!(backoff, Duration::from_secs(2));
        for _ in 0..10 {
            backoff = policy.grow(backoff);
        }
        assert_eq!(backoff, policy.max_backoff);
    }
}
