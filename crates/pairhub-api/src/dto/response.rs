//! Response DTOs.

use serde::{Deserialize, Serialize};

use pairhub_core::types::{AdminSessionId, ChatId, ClientId};
use pairhub_realtime::VideoSession;

/// Successful operator login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub session_id: AdminSessionId,
}

/// One active video chat as shown to operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoChatSummary {
    pub id: ChatId,
    pub client1: ClientId,
    pub client2: ClientId,
}

impl From<VideoSession> for VideoChatSummary {
    fn from(session: VideoSession) -> Self {
        Self {
            id: session.id,
            client1: session.client_a,
            client2: session.client_b,
        }
    }
}

/// Active video chat listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoChatsResponse {
    pub success: bool,
    pub chats: Vec<VideoChatSummary>,
}

/// Generic `{success, message}` acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Whether the request was successful.
    pub success: bool,
    /// Human-readable message.
    pub message: String,
}

impl MessageResponse {
    /// Creates a successful response.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Service status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Always `"OK"` while the process serves requests.
    pub status: String,
    /// Registered client sessions.
    pub connections: usize,
}
