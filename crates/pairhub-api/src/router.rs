//! Route definitions for the PairHub HTTP API.
//!
//! REST routes are mounted under `/api`; the WebSocket upgrades live at
//! the root.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new().merge(admin_routes()).merge(status_routes());

    let ws_routes = Router::new()
        .route("/ws", get(handlers::ws::client_ws))
        .route("/ws/admin", get(handlers::ws::admin_ws));

    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .merge(ws_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Operator login/logout and video chat monitoring
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/login", post(handlers::admin::auth::login))
        .route("/admin/logout", post(handlers::admin::auth::logout))
        .route("/admin/videochats", get(handlers::admin::monitor::list_video_chats))
        .route("/admin/monitor", post(handlers::admin::monitor::start_monitoring))
        .route("/admin/stop-monitor", post(handlers::admin::monitor::stop_monitoring))
}

fn status_routes() -> Router<AppState> {
    Router::new().route("/status", get(handlers::health::status))
}
