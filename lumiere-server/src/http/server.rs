//! Axum server setup
//!
//! Server skeleton with:
//! - Localhost-only CORS by default
//! - Tracing middleware
//! - Uploaded files served back under the public prefix
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::{openapi, routes};
use crate::config::ServerSettings;
use crate::state::AppState;

/// Origins allowed when CORS is not permissive
const LOCALHOST_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:3030",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:3030",
];

fn cors_layer(settings: &ServerSettings) -> CorsLayer {
    if settings.permissive_cors {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = LOCALHOST_ORIGINS
        .iter()
        .copied()
        .chain(settings.allowed_origins.iter().map(String::as_str))
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the full application router.
///
/// API resources live under `/api`; health, the OpenAPI document and
/// uploaded files sit at the root.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server);
    let max_body_bytes = state.config.storage.max_body_bytes;
    let uploads = ServeDir::new(state.local_store.dir());
    let public_prefix = state.local_store.public_prefix().to_string();

    let api = Router::new()
        .merge(routes::photos::router())
        .merge(routes::categories::router())
        .merge(routes::awards::router())
        .merge(routes::media::router(max_body_bytes))
        .merge(routes::auth::router());

    Router::new()
        .nest("/api", api)
        .merge(routes::health::router())
        .merge(openapi::router())
        .nest_service(&public_prefix, uploads)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Run the HTTP server.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&database_url).await?;
/// let state = AppState::from_config(pool, config.clone())?;
/// run_server(state, &config.server).await?;
/// ```
pub async fn run_server(state: AppState, settings: &ServerSettings) -> Result<(), ServerError> {
    let app = build_router(state);

    // Bind listener
    let listener = TcpListener::bind(settings.bind).await?;
    tracing::info!("Server listening on {}", settings.bind);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
