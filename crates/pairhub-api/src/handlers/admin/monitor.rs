//! Video chat listing and observer attachment.

use axum::Json;
use axum::extract::{Query, State};
use validator::Validate;

use pairhub_core::error::AppError;
use pairhub_core::types::{AdminSessionId, ChatId};

use crate::dto::request::{MonitorRequest, SessionQuery, parse_admin_session};
use crate::dto::response::{MessageResponse, VideoChatSummary, VideoChatsResponse};
use crate::error::ApiResult;
use crate::extractors::ApiJson;
use crate::state::AppState;

/// GET /api/admin/videochats?sessionId=
pub async fn list_video_chats(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> ApiResult<Json<VideoChatsResponse>> {
    let admin_id = parse_admin_session(query.session_id.as_deref())?;
    let chats = state
        .realtime
        .list_active_video_sessions(&admin_id)
        .await?
        .into_iter()
        .map(VideoChatSummary::from)
        .collect();

    Ok(Json(VideoChatsResponse {
        success: true,
        chats,
    }))
}

/// POST /api/admin/monitor
pub async fn start_monitoring(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<MonitorRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let (admin_id, chat_id) = authorize_chat_request(&state, &req).await?;
    state.realtime.start_monitoring(admin_id, chat_id).await?;
    Ok(Json(MessageResponse::ok("Monitoring started")))
}

/// POST /api/admin/stop-monitor
pub async fn stop_monitoring(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<MonitorRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let (admin_id, chat_id) = authorize_chat_request(&state, &req).await?;
    state.realtime.stop_monitoring(admin_id, chat_id).await?;
    Ok(Json(MessageResponse::ok("Monitoring stopped")))
}

/// Checks the session (401) before the chat id (400). A chat id that is
/// not a valid id cannot name a chat, so it is reported as 404.
async fn authorize_chat_request(
    state: &AppState,
    req: &MonitorRequest,
) -> ApiResult<(AdminSessionId, ChatId)> {
    let admin_id = parse_admin_session(req.session_id.as_deref())?;
    if !state.realtime.is_admin(&admin_id).await {
        return Err(AppError::unauthorized("Invalid or expired admin session").into());
    }

    req.validate()?;

    let raw = req.chat_id.as_deref().map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(AppError::validation("chatId is required").into());
    }

    let chat_id = raw
        .parse::<ChatId>()
        .map_err(|_| AppError::not_found("Video chat not found"))?;

    Ok((admin_id, chat_id))
}
