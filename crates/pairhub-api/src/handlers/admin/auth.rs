//! Operator login and logout.

use axum::Json;
use axum::extract::State;
use tracing::info;

use pairhub_core::error::AppError;

use crate::dto::request::{LoginRequest, LogoutRequest, parse_admin_session};
use crate::dto::response::{LoginResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::ApiJson;
use crate::state::AppState;

/// POST /api/admin/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let session_id = state
        .realtime
        .login(&req.password)
        .await
        .map_err(|_| AppError::unauthorized("Invalid password"))?;

    info!(admin_session = %session_id, "Operator logged in");
    Ok(Json(LoginResponse {
        success: true,
        session_id,
    }))
}

/// POST /api/admin/logout
pub async fn logout(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LogoutRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let admin_id = parse_admin_session(req.session_id.as_deref())?;
    state.realtime.logout(admin_id).await?;
    Ok(Json(MessageResponse::ok("Logged out")))
}
