//! Message shape validation.
//!
//! Raw text frames are checked in a fixed order: size, emptiness, JSON
//! syntax, the `type` tag, and finally the per-type required fields.

use serde_json::{Map, Value};
use thiserror::Error;

use pairhub_core::config::RealtimeConfig;

use super::types::{ChatMode, InboundMessage, SignalKind};

/// Why an inbound frame was rejected. The `Display` text is sent back to
/// the client inside an `ERROR` frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Frame is larger than `max_message_bytes`.
    #[error("Message exceeds maximum size of {limit} bytes")]
    TooLarge {
        /// Configured limit.
        limit: usize,
    },
    /// Binary frame that is not UTF-8.
    #[error("Message is not valid UTF-8")]
    InvalidEncoding,
    /// Frame is empty or whitespace.
    #[error("Empty message")]
    Empty,
    /// Frame is not valid JSON.
    #[error("Invalid message format")]
    Malformed,
    /// Frame is not an object with a string `type`.
    #[error("Message type is required")]
    MissingType,
    /// A required field is absent or has the wrong shape.
    #[error("Invalid field '{field}': {reason}")]
    InvalidField {
        /// Offending field name.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Validates raw client frames into [`InboundMessage`]s.
#[derive(Debug, Clone)]
pub struct MessageValidator {
    max_message_bytes: usize,
    max_text_length: usize,
}

impl MessageValidator {
    /// Creates a validator with explicit limits.
    pub fn new(max_message_bytes: usize, max_text_length: usize) -> Self {
        Self {
            max_message_bytes,
            max_text_length,
        }
    }

    /// Creates a validator from the realtime configuration.
    pub fn from_config(config: &RealtimeConfig) -> Self {
        Self::new(config.max_message_bytes, config.max_text_length)
    }

    /// Validates a raw frame.
    ///
    /// `PING` is recognized as soon as the `type` tag is read; other
    /// fields on a ping are ignored.
    pub fn validate(&self, raw: &str) -> Result<InboundMessage, ValidationError> {
        if raw.len() > self.max_message_bytes {
            return Err(ValidationError::TooLarge {
                limit: self.max_message_bytes,
            });
        }

        if raw.trim().is_empty() {
            return Err(ValidationError::Empty);
        }

        let value: Value = serde_json::from_str(raw).map_err(|_| ValidationError::Malformed)?;
        let fields = value.as_object().ok_or(ValidationError::MissingType)?;

        let message_type = match fields.get("type") {
            Some(Value::String(t)) if !t.is_empty() => t.clone(),
            _ => return Err(ValidationError::MissingType),
        };

        let kind = match message_type.as_str() {
            "PING" => return Ok(InboundMessage::Ping),
            "LEAVE" => return Ok(InboundMessage::Leave),
            "FIND_PARTNER" => {
                let mode = fields
                    .get("mode")
                    .and_then(Value::as_str)
                    .and_then(|m| m.parse::<ChatMode>().ok())
                    .ok_or_else(|| ValidationError::InvalidField {
                        field: "mode",
                        reason: "must be \"text\" or \"video\"".to_string(),
                    })?;
                return Ok(InboundMessage::FindPartner { mode });
            }
            "TEXT_MESSAGE" => {
                self.check_text(fields)?;
                return Ok(InboundMessage::TextMessage(raw.to_owned()));
            }
            "OFFER" => SignalKind::Offer,
            "ANSWER" => SignalKind::Answer,
            "ICE_CANDIDATE" => SignalKind::IceCandidate,
            _ => return Ok(InboundMessage::Unknown(message_type)),
        };

        Ok(InboundMessage::Signal {
            kind,
            frame: raw.to_owned(),
        })
    }

    fn check_text(&self, fields: &Map<String, Value>) -> Result<(), ValidationError> {
        let Some(text) = fields.get("text").and_then(Value::as_str) else {
            return Err(ValidationError::InvalidField {
                field: "text",
                reason: "must be a string".to_string(),
            });
        };

        if text.chars().count() > self.max_text_length {
            return Err(ValidationError::InvalidField {
                field: "text",
                reason: format!("must be at most {} characters", self.max_text_length),
            });
        }

        Ok(())
    }
}

impl Default for MessageValidator {
    fn default() -> Self {
        Self::from_config(&RealtimeConfig::default())
    }
}
