//! HTTP layer: a thin axum surface over [`crate::engine::MatchEngine`].
//!
//! Endpoints:
//! - `POST /set_recognized` `{ "url": ... }`: fetch and register.
//! - `POST /check` `{ "url": ... }`: fetch and query.
//! - `GET /known`: registered entry ids in insertion order.
//! - `GET /health`: liveness and registry size.
//!
//! Verb choice, status codes, and body shapes all live here; the engine's
//! register/query contract knows nothing about HTTP.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use state::ServerState;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

/// Build the axum router with all routes and middleware.
pub fn build_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/set_recognized", post(routes::set_recognized))
        .route("/check", post(routes::check))
        .route("/known", get(routes::known))
        .route("/health", get(routes::health))
        .fallback(routes::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(state.config.timeout()))
                .layer(DefaultBodyLimit::max(state.config.max_body_size())),
        )
        .with_state(state)
}

/// Start the HTTP server and block until shutdown.
///
/// Initializes tracing, opens the store, performs the startup registry
/// load, then serves until SIGTERM or Ctrl+C.
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_level))
        .with_target(false)
        .init();

    let state = Arc::new(ServerState::new(config.clone())?);
    let app = build_router(state.clone());

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        %addr,
        known_images = state.engine.known_count(),
        db = %config.db_path.display(),
        "histmatch server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
