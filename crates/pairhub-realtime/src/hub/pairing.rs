//! Matchmaking: FIFO partner selection and pair establishment.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use pairhub_core::types::{ChatId, ClientId};

use crate::message::types::{ChatMode, OutboundMessage};
use crate::metrics::EngineMetrics;

use super::HubState;

impl HubState {
    /// Matches `id` with the longest-waiting client in `mode`, or queues it.
    ///
    /// An existing pairing is torn down first, so find / leave / find
    /// sequences compose. Returns the new partner, if one was found.
    pub fn find_partner(&mut self, id: ClientId, mode: ChatMode, now: DateTime<Utc>) -> Option<ClientId> {
        let already_paired = self.registry.get(&id)?.partner_id.is_some();
        if already_paired {
            self.leave(id, now);
        }

        if let Some(session) = self.registry.get_mut(&id) {
            session.mode = Some(mode);
        }
        self.pools.remove(&id);

        match self.take_waiting(mode, &id) {
            Some(partner_id) => {
                self.pair(id, partner_id, now);
                Some(partner_id)
            }
            None => {
                self.pools.enqueue(mode, id);
                debug!(client_id = %id, mode = %mode, waiting = self.pools.len(mode), "Client waiting for partner");
                None
            }
        }
    }

    /// Pops the oldest usable entry of the `mode` pool, skipping stale ids.
    fn take_waiting(&mut self, mode: ChatMode, requester: &ClientId) -> Option<ClientId> {
        while let Some(candidate) = self.pools.pop_front(mode) {
            if candidate == *requester {
                continue;
            }
            match self.registry.get(&candidate) {
                Some(s) if s.partner_id.is_none() && s.mode == Some(mode) => return Some(candidate),
                _ => debug!(client_id = %candidate, mode = %mode, "Skipping stale pool entry"),
            }
        }
        None
    }

    /// Links two unpaired sessions and announces each to the other.
    ///
    /// When both sides are in video mode a [`super::VideoSession`] is
    /// recorded and its id returned.
    pub(crate) fn pair(&mut self, a: ClientId, b: ClientId, now: DateTime<Utc>) -> Option<ChatId> {
        if a == b || !self.registry.contains(&a) || !self.registry.contains(&b) {
            warn!(client_a = %a, client_b = %b, "Refusing to pair unknown or identical sessions");
            return None;
        }

        for (me, other) in [(a, b), (b, a)] {
            if let Some(session) = self.registry.get_mut(&me) {
                session.partner_id = Some(other);
                session.observers.clear();
                session.send(&OutboundMessage::PartnerFound { partner_id: other });
            }
        }
        EngineMetrics::incr(&self.metrics.pairings_made);

        let both_video = [a, b]
            .iter()
            .all(|id| self.registry.get(id).and_then(|s| s.mode) == Some(ChatMode::Video));

        if both_video {
            let chat_id = self.video_sessions.insert(a, b, now);
            info!(client_a = %a, client_b = %b, chat_id = %chat_id, "Video pair created");
            Some(chat_id)
        } else {
            info!(client_a = %a, client_b = %b, "Text pair created");
            None
        }
    }
}
