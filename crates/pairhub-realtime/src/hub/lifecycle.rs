//! Connect, leave and disconnect handling.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use pairhub_core::types::{AdminSessionId, ClientId};

use crate::connection::ConnectionHandle;
use crate::message::types::OutboundMessage;
use crate::metrics::EngineMetrics;

use super::HubState;

impl HubState {
    /// Registers a new client owning `transport` and greets it with `JOIN`.
    pub fn connect(&mut self, transport: ConnectionHandle, now: DateTime<Utc>) -> ClientId {
        let connection_id = transport.id;
        let id = self.registry.create(transport, now);

        if let Some(session) = self.registry.get(&id) {
            session.send(&OutboundMessage::Join { client_id: id });
        }

        EngineMetrics::incr(&self.metrics.connections_opened);
        info!(client_id = %id, connection_id = %connection_id, "Client connected");
        id
    }

    /// Ends the client's current pairing and removes it from the waiting pools.
    ///
    /// Safe to call on an unpaired or unknown session. Returns whether a
    /// pairing was torn down.
    pub fn leave(&mut self, id: ClientId, now: DateTime<Utc>) -> bool {
        self.pools.remove(&id);

        let Some(partner_id) = self.registry.get(&id).and_then(|s| s.partner_id) else {
            if let Some(session) = self.registry.get_mut(&id) {
                session.observers.clear();
            }
            return false;
        };

        self.end_video_session(&id, &partner_id, now);

        if let Some(partner) = self.registry.get_mut(&partner_id) {
            if partner.partner_id == Some(id) {
                partner.partner_id = None;
                partner.observers.clear();
                partner.send(&OutboundMessage::PartnerDisconnected);
            }
        }

        if let Some(session) = self.registry.get_mut(&id) {
            session.partner_id = None;
            session.observers.clear();
        }

        debug!(client_id = %id, partner_id = %partner_id, "Pairing ended");
        true
    }

    /// Handles a closed or failed transport: leaves, then unregisters.
    ///
    /// Returns `false` if the session was already gone.
    pub fn disconnect(&mut self, id: ClientId, now: DateTime<Utc>) -> bool {
        if !self.registry.contains(&id) {
            return false;
        }

        self.leave(id, now);

        if let Some(session) = self.registry.remove(&id) {
            session.transport().mark_dead();
        }

        EngineMetrics::incr(&self.metrics.connections_closed);
        info!(client_id = %id, "Client disconnected");
        true
    }

    /// Tells observers the chat between `a` and `b` is over, then drops its record.
    fn end_video_session(&mut self, a: &ClientId, b: &ClientId, now: DateTime<Utc>) {
        let Some(chat_id) = self.video_sessions.find_between(a, b) else {
            return;
        };

        let observers: BTreeSet<AdminSessionId> = [a, b]
            .into_iter()
            .filter_map(|id| self.registry.get(id))
            .flat_map(|s| s.observers.iter().copied())
            .collect();

        let notified = self.push_to_observers(&observers, &OutboundMessage::AdminChatEnded { chat_id }, now);
        self.video_sessions.remove(&chat_id);

        info!(chat_id = %chat_id, observers_notified = notified, "Video session ended");
    }
}
