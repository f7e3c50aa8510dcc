//! The single serialization domain for all shared matchmaking state.
//!
//! [`HubState`] owns the session registry, both waiting pools, the video
//! session table and the admin session store. It is plain data with
//! synchronous methods; [`crate::RealtimeEngine`] wraps it in one mutex so
//! every operation runs to completion before the next one starts.

pub mod lifecycle;
pub mod pairing;
pub mod pools;
pub mod registry;
pub mod relay;
pub mod router;
pub mod video;

use std::collections::HashMap;
use std::sync::Arc;

use pairhub_auth::AdminSessionStore;
use pairhub_core::config::{AdminConfig, RealtimeConfig};
use pairhub_core::types::{AdminSessionId, ClientId};

use crate::connection::ConnectionHandle;
use crate::message::types::ChatMode;
use crate::message::validator::MessageValidator;
use crate::metrics::EngineMetrics;

pub use pools::WaitingPools;
pub use registry::{ClientSession, SessionInfo, SessionRegistry};
pub use video::{VideoSession, VideoSessionTable};

/// All mutable state shared between connections, admin calls and the sweeper.
#[derive(Debug)]
pub struct HubState {
    pub(crate) registry: SessionRegistry,
    pub(crate) pools: WaitingPools,
    pub(crate) video_sessions: VideoSessionTable,
    pub(crate) admins: AdminSessionStore,
    pub(crate) observer_transports: HashMap<AdminSessionId, ConnectionHandle>,
    pub(crate) validator: MessageValidator,
    pub(crate) metrics: Arc<EngineMetrics>,
}

impl HubState {
    /// Creates empty state sized by configuration.
    pub fn new(realtime: &RealtimeConfig, admin: &AdminConfig, metrics: Arc<EngineMetrics>) -> Self {
        Self {
            registry: SessionRegistry::new(),
            pools: WaitingPools::new(),
            video_sessions: VideoSessionTable::new(),
            admins: AdminSessionStore::from_config(admin),
            observer_transports: HashMap::new(),
            validator: MessageValidator::from_config(realtime),
            metrics,
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn pools(&self) -> &WaitingPools {
        &self.pools
    }

    pub fn video_sessions(&self) -> &VideoSessionTable {
        &self.video_sessions
    }

    pub fn admins(&self) -> &AdminSessionStore {
        &self.admins
    }

    /// Drops all state, marking every client and observer transport dead.
    pub fn clear(&mut self) {
        self.registry.drain();
        self.pools.clear();
        self.video_sessions.clear();
        self.admins.clear();
        for (_, transport) in self.observer_transports.drain() {
            transport.mark_dead();
        }
    }

    /// Lists every broken structural invariant. Empty when the state is consistent.
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for session in self.registry.iter() {
            if let Some(partner_id) = session.partner_id {
                match self.registry.get(&partner_id) {
                    Some(partner) if partner.partner_id == Some(session.id) => {}
                    Some(_) => problems.push(format!("{} -> {} is not symmetric", session.id, partner_id)),
                    None => problems.push(format!("{} points at missing partner {}", session.id, partner_id)),
                }

                let both_video = session.mode == Some(ChatMode::Video)
                    && self.registry.get(&partner_id).and_then(|p| p.mode) == Some(ChatMode::Video);
                let has_chat = self.video_sessions.find_between(&session.id, &partner_id).is_some();
                if both_video != has_chat {
                    problems.push(format!(
                        "video pair {}/{} has_chat={} both_video={}",
                        session.id, partner_id, has_chat, both_video
                    ));
                }
            }

            let queued_in: Vec<ChatMode> = [ChatMode::Text, ChatMode::Video]
                .into_iter()
                .filter(|mode| self.pools.contains(*mode, &session.id))
                .collect();
            match queued_in.as_slice() {
                [] => {}
                [mode] if session.mode == Some(*mode) && session.partner_id.is_none() => {}
                _ => problems.push(format!("{} is queued in {:?} with mode {:?}", session.id, queued_in, session.mode)),
            }
        }

        for mode in [ChatMode::Text, ChatMode::Video] {
            for id in self.pools.waiting(mode) {
                if !self.registry.contains(&id) {
                    problems.push(format!("{id} waits in the {mode} pool but is not registered"));
                }
            }
        }

        for chat in self.video_sessions.list() {
            let paired = |a: &ClientId, b: &ClientId| {
                self.registry
                    .get(a)
                    .is_some_and(|s| s.partner_id == Some(*b) && s.mode == Some(ChatMode::Video))
            };
            if !paired(&chat.client_a, &chat.client_b) || !paired(&chat.client_b, &chat.client_a) {
                problems.push(format!("video session {} is stale", chat.id));
            }
        }

        problems
    }
}
