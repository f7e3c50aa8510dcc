//! Inbound frame dispatch.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use pairhub_core::types::ClientId;

use crate::message::types::{InboundMessage, OutboundMessage};
use crate::message::validator::ValidationError;
use crate::metrics::EngineMetrics;

use super::HubState;

impl HubState {
    /// Validates one raw frame from `from` and runs the matching handler.
    ///
    /// Invalid frames are answered with `ERROR` and change nothing else.
    /// The sender's activity timestamp is refreshed whatever the outcome.
    pub fn handle_inbound(&mut self, from: ClientId, raw: &str, now: DateTime<Utc>) {
        let parsed = self.validator.validate(raw);
        self.dispatch(from, parsed, now);
    }

    /// Same as [`Self::handle_inbound`] for binary frames. Bytes that are
    /// not UTF-8 are rejected with `ERROR`.
    pub fn handle_inbound_bytes(&mut self, from: ClientId, bytes: &[u8], now: DateTime<Utc>) {
        let parsed = match std::str::from_utf8(bytes) {
            Ok(raw) => self.validator.validate(raw),
            Err(_) => Err(ValidationError::InvalidEncoding),
        };
        self.dispatch(from, parsed, now);
    }

    fn dispatch(
        &mut self,
        from: ClientId,
        parsed: Result<InboundMessage, ValidationError>,
        now: DateTime<Utc>,
    ) {
        if !self.registry.contains(&from) {
            debug!(client_id = %from, "Frame from unregistered client ignored");
            return;
        }
        EngineMetrics::incr(&self.metrics.messages_received);

        match parsed {
            Ok(InboundMessage::Ping) => self.reply(&from, &OutboundMessage::Pong),
            Ok(InboundMessage::FindPartner { mode }) => {
                self.find_partner(from, mode, now);
            }
            Ok(InboundMessage::TextMessage(frame)) => {
                self.relay_text(&from, &frame);
            }
            Ok(InboundMessage::Signal { kind, frame }) => {
                debug!(client_id = %from, signal = kind.as_str(), "Relaying signal");
                self.relay_signal(&from, &frame, now);
            }
            Ok(InboundMessage::Leave) => {
                self.leave(from, now);
            }
            Ok(InboundMessage::Unknown(message_type)) => {
                debug!(client_id = %from, message_type = %message_type, "Dropping unrecognized message type");
            }
            Err(e) => {
                warn!(client_id = %from, error = %e, "Rejected inbound frame");
                self.reply(&from, &OutboundMessage::error(e.to_string()));
            }
        }

        self.registry.touch(&from, now);
    }

    fn reply(&self, to: &ClientId, msg: &OutboundMessage) {
        if let Some(session) = self.registry.get(to) {
            session.send(msg);
        }
    }
}
