//! Application builder and server entry point.

use axum::Router;
use tracing::info;

use pairhub_core::config::AppConfig;
use pairhub_core::error::AppError;
use pairhub_core::AppResult;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the PairHub server until Ctrl+C, then shuts the engine down.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    info!("Starting PairHub server...");

    let addr = config.server.bind_address();
    let state = AppState::from_config(config);
    let engine = state.realtime.clone();
    let sweeper = engine.start_sweeper();

    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!("PairHub server listening on {}", addr);

    // Close client sockets before the connection drain.
    let shutdown_engine = engine.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            shutdown_engine.shutdown().await;
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Err(e) = sweeper.await {
        tracing::warn!(error = %e, "Sweeper task ended abnormally");
    }

    info!("PairHub server stopped");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("Shutdown signal received");
}
