//! Poker Points Back binary entrypoint wiring REST routes to the configured
//! storage backend.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use poker_points_back::{
    config::{AppConfig, StorageBackendKind},
    dao::{score_store::ScoreStore, storage::StorageError},
    routes,
    services::storage_supervisor,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::load();
    let app_state = AppState::new();

    spawn_supervisor(app_state.clone(), config.backend);
    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Launch the storage supervisor for the configured backend. Each closure
/// reads its backend config fresh on every attempt so environment fixes are
/// picked up without a restart.
fn spawn_supervisor(state: poker_points_back::state::SharedState, backend: StorageBackendKind) {
    match backend {
        #[cfg(feature = "sqlite-store")]
        StorageBackendKind::Sqlite => {
            use poker_points_back::dao::score_store::sqlite::{SqliteConfig, SqliteScoreStore};

            tokio::spawn(storage_supervisor::run(state, || async {
                let store = SqliteScoreStore::connect(SqliteConfig::from_env()).await?;
                Ok(Arc::new(store) as Arc<dyn ScoreStore>)
            }));
        }
        #[cfg(feature = "github-store")]
        StorageBackendKind::Github => {
            use poker_points_back::dao::score_store::github::{GithubConfig, GithubScoreStore};

            tokio::spawn(storage_supervisor::run(state, || async {
                let config = GithubConfig::from_env().map_err(StorageError::from)?;
                let store = GithubScoreStore::connect(config).await?;
                Ok(Arc::new(store) as Arc<dyn ScoreStore>)
            }));
        }
    }
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: poker_points_back::state::SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
