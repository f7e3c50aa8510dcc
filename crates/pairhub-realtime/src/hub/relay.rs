//! Partner relay for chat and signaling frames.
//!
//! Frames are forwarded as the exact text the sender produced.
//! Delivery is best effort: a closed partner transport drops the frame.

use chrono::{DateTime, Utc};
use serde_json::value::RawValue;
use tracing::{debug, warn};

use pairhub_core::types::ClientId;

use crate::message::types::OutboundMessage;
use crate::metrics::EngineMetrics;

use super::HubState;

impl HubState {
    /// Forwards a `TEXT_MESSAGE` frame to the sender's partner.
    pub fn relay_text(&self, from: &ClientId, frame: &str) -> bool {
        self.forward_to_partner(from, frame)
    }

    /// Forwards a signaling frame to the sender's partner and mirrors it
    /// to every observer when the sender is monitored.
    pub fn relay_signal(&self, from: &ClientId, frame: &str, now: DateTime<Utc>) -> bool {
        let Some(sender) = self.registry.get(from) else {
            return false;
        };
        if sender.partner_id.is_none() {
            return false;
        }

        let delivered = self.forward_to_partner(from, frame);

        if sender.monitored() {
            match RawValue::from_string(frame.to_owned()) {
                Ok(signal_data) => {
                    let mirrored = OutboundMessage::AdminMonitor {
                        source_client_id: *from,
                        signal_data,
                    };
                    let observers_reached = self.push_to_observers(&sender.observers, &mirrored, now);
                    debug!(client_id = %from, observers_reached, "Signal mirrored to observers");
                }
                Err(e) => {
                    warn!(client_id = %from, error = %e, "Signal frame is not JSON, not mirrored");
                }
            }
        }

        delivered
    }

    fn forward_to_partner(&self, from: &ClientId, frame: &str) -> bool {
        let Some(partner_id) = self.registry.get(from).and_then(|s| s.partner_id) else {
            return false;
        };
        let Some(partner) = self.registry.get(&partner_id) else {
            return false;
        };

        if !partner.transport().is_open() {
            debug!(client_id = %from, partner_id = %partner_id, "Partner transport closed, dropping frame");
            return false;
        }

        let delivered = partner.transport().send_raw(frame.to_owned());
        if delivered {
            EngineMetrics::incr(&self.metrics.messages_relayed);
        }
        delivered
    }
}
