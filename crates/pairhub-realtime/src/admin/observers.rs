//! Observer transports and delivery to observing admins.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use pairhub_core::types::AdminSessionId;

use crate::connection::{ConnectionHandle, ConnectionId};
use crate::hub::HubState;
use crate::message::types::{InboundMessage, OutboundMessage};
use crate::metrics::EngineMetrics;

use super::monitor::MonitorError;

impl HubState {
    /// Binds a push socket to an admin session, replacing any earlier one.
    pub fn attach_observer_transport(
        &mut self,
        admin_id: AdminSessionId,
        transport: ConnectionHandle,
        now: DateTime<Utc>,
    ) -> Result<ConnectionId, MonitorError> {
        self.require_admin(&admin_id, now)?;

        let connection_id = transport.id;
        if let Some(previous) = self.observer_transports.insert(admin_id, transport) {
            previous.mark_dead();
            debug!(admin_session = %admin_id, replaced = %previous.id, "Observer socket replaced");
        }

        info!(admin_session = %admin_id, connection_id = %connection_id, "Observer socket attached");
        Ok(connection_id)
    }

    /// Unbinds the socket `connection_id` if it is still the admin's current one.
    ///
    /// The admin session itself stays valid.
    pub fn detach_observer_transport(&mut self, admin_id: &AdminSessionId, connection_id: ConnectionId) -> bool {
        let is_current = self
            .observer_transports
            .get(admin_id)
            .is_some_and(|t| t.id == connection_id);

        if is_current {
            if let Some(transport) = self.observer_transports.remove(admin_id) {
                transport.mark_dead();
            }
            debug!(admin_session = %admin_id, connection_id = %connection_id, "Observer socket detached");
        }
        is_current
    }

    /// Answers `PING` on an observer socket; anything else is ignored.
    pub fn handle_admin_inbound(&self, admin_id: &AdminSessionId, raw: &str) {
        if let Ok(InboundMessage::Ping) = self.validator.validate(raw) {
            if let Some(transport) = self.observer_transports.get(admin_id) {
                transport.send(&OutboundMessage::Pong);
            }
        }
    }

    /// Sends `msg` to each live observer with an open socket.
    ///
    /// Returns how many observers it reached.
    pub(crate) fn push_to_observers(
        &self,
        observers: &BTreeSet<AdminSessionId>,
        msg: &OutboundMessage,
        now: DateTime<Utc>,
    ) -> usize {
        if observers.is_empty() {
            return 0;
        }

        let frame = match msg.to_frame() {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize observer message");
                return 0;
            }
        };

        let mut reached = 0;
        for admin_id in observers {
            if !self.admins.is_valid(admin_id, now) {
                continue;
            }
            let Some(transport) = self.observer_transports.get(admin_id) else {
                continue;
            };
            if transport.is_open() && transport.send_raw(frame.clone()) {
                reached += 1;
                EngineMetrics::incr(&self.metrics.messages_mirrored);
            }
        }
        reached
    }

    /// Removes an admin from every observer set and drops its socket.
    pub(crate) fn detach_admin(&mut self, admin_id: &AdminSessionId) {
        for session in self.registry.iter_mut() {
            session.observers.remove(admin_id);
        }
        if let Some(transport) = self.observer_transports.remove(admin_id) {
            transport.mark_dead();
        }
    }
}
