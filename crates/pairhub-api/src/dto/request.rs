//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use pairhub_core::error::AppError;
use pairhub_core::AppResult;
use pairhub_core::types::AdminSessionId;

/// Operator login body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Operator password. A missing password is a failed login.
    #[serde(default)]
    pub password: String,
}

/// Body of `monitor` and `stop-monitor`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MonitorRequest {
    /// Admin session token.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Video chat to (stop) observe.
    #[serde(default)]
    #[validate(
        required(message = "chatId is required"),
        length(min = 1, message = "chatId is required")
    )]
    pub chat_id: Option<String>,
}

/// Body of `logout`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    /// Admin session token.
    #[serde(default)]
    pub session_id: Option<String>,
}

/// `?sessionId=` query used by the chat listing and the observer socket.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionQuery {
    /// Admin session token.
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Parses an admin session token. Anything unusable is Unauthorized.
pub fn parse_admin_session(raw: Option<&str>) -> AppResult<AdminSessionId> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| AppError::unauthorized("Invalid or expired admin session"))
}
