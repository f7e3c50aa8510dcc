//! Status handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::StatusResponse;
use crate::state::AppState;

/// GET /api/status
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "OK".to_string(),
        connections: state.realtime.connection_count().await,
    })
}
