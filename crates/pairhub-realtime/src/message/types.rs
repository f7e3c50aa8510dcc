//! Inbound and outbound WebSocket message type definitions.
//!
//! Every frame is a JSON object tagged by a SCREAMING_SNAKE_CASE `type`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use pairhub_core::types::{ChatId, ClientId};

/// The kind of conversation a client wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    /// Text-only chat.
    Text,
    /// WebRTC video chat.
    Video,
}

impl ChatMode {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Video => "video",
        }
    }
}

impl fmt::Display for ChatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChatMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "video" => Ok(Self::Video),
            _ => Err(()),
        }
    }
}

/// WebRTC signaling message kinds. All are routed identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Offer,
    Answer,
    IceCandidate,
}

impl SignalKind {
    /// Wire `type` tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Offer => "OFFER",
            Self::Answer => "ANSWER",
            Self::IceCandidate => "ICE_CANDIDATE",
        }
    }
}

/// A validated client frame.
///
/// Relayed variants keep the frame text exactly as received so it can be
/// forwarded byte for byte.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// Keep-alive.
    Ping,
    /// Request a partner in the given mode.
    FindPartner {
        /// Requested chat mode.
        mode: ChatMode,
    },
    /// Chat line for the partner, as the raw frame.
    TextMessage(String),
    /// Opaque signaling payload for the partner.
    Signal {
        /// Which signaling step this is.
        kind: SignalKind,
        /// The raw frame.
        frame: String,
    },
    /// End the current pairing and stop waiting.
    Leave,
    /// Well-formed frame with a type the server does not handle.
    Unknown(String),
}

/// Messages sent by the server to clients and admin observers.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutboundMessage {
    /// Identity assigned on connect.
    #[serde(rename_all = "camelCase")]
    Join {
        /// The connecting client's id.
        client_id: ClientId,
    },
    /// Reply to `PING`.
    Pong,
    /// A partner was matched.
    #[serde(rename_all = "camelCase")]
    PartnerFound {
        /// The partner's id.
        partner_id: ClientId,
    },
    /// The partner left or dropped.
    PartnerDisconnected,
    /// The last inbound frame was rejected.
    Error {
        /// Human-readable reason.
        message: String,
    },
    /// Mirrored signaling frame for an observing admin.
    #[serde(rename_all = "camelCase")]
    AdminMonitor {
        /// Client that sent the signaling frame.
        source_client_id: ClientId,
        /// The signaling frame as received.
        signal_data: Box<RawValue>,
    },
    /// A monitored video chat ended.
    #[serde(rename_all = "camelCase")]
    AdminChatEnded {
        /// The ended chat.
        chat_id: ChatId,
    },
}

impl OutboundMessage {
    /// Builds an `ERROR` frame.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Serializes the message to a JSON text frame.
    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
