//! Client session registry.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pairhub_core::types::{AdminSessionId, ClientId};

use crate::connection::ConnectionHandle;
use crate::message::types::{ChatMode, OutboundMessage};

/// Server-side record for one connected client.
#[derive(Debug)]
pub struct ClientSession {
    /// Assigned on connect.
    pub id: ClientId,
    /// Requested chat mode; `None` until the first `FIND_PARTNER`.
    pub mode: Option<ChatMode>,
    /// Current partner, if paired.
    pub partner_id: Option<ClientId>,
    /// Admin sessions watching this client's signaling.
    pub observers: BTreeSet<AdminSessionId>,
    /// Refreshed on every processed inbound frame.
    pub last_active_at: DateTime<Utc>,
    transport: ConnectionHandle,
}

impl ClientSession {
    /// Whether at least one admin is observing this session.
    pub fn monitored(&self) -> bool {
        !self.observers.is_empty()
    }

    /// The session's outbound transport.
    pub fn transport(&self) -> &ConnectionHandle {
        &self.transport
    }

    /// Pushes a message to the client. Dropped silently if the transport is closed.
    pub fn send(&self, msg: &OutboundMessage) -> bool {
        self.transport.send(msg)
    }

    /// Read-only view for callers outside the engine.
    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            id: self.id,
            mode: self.mode,
            partner_id: self.partner_id,
            monitored: self.monitored(),
            observers: self.observers.iter().copied().collect(),
            last_active_at: self.last_active_at,
            open: self.transport.is_open(),
        }
    }
}

/// Snapshot of a client session (serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    /// Client id
    pub id: ClientId,
    /// Requested mode
    pub mode: Option<ChatMode>,
    /// Partner, if paired
    pub partner_id: Option<ClientId>,
    /// Whether any admin is observing
    pub monitored: bool,
    /// Observing admin sessions
    pub observers: Vec<AdminSessionId>,
    /// Last processed inbound frame
    pub last_active_at: DateTime<Utc>,
    /// Whether the transport is open
    pub open: bool,
}

/// Owns every connected client session.
///
/// Lookups on removed ids return `None`; removal is idempotent.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<ClientId, ClientSession>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new session owning `transport` and returns its id.
    pub fn create(&mut self, transport: ConnectionHandle, now: DateTime<Utc>) -> ClientId {
        let id = ClientId::new();
        self.sessions.insert(
            id,
            ClientSession {
                id,
                mode: None,
                partner_id: None,
                observers: BTreeSet::new(),
                last_active_at: now,
                transport,
            },
        );
        id
    }

    pub fn get(&self, id: &ClientId) -> Option<&ClientSession> {
        self.sessions.get(id)
    }

    pub fn get_mut(&mut self, id: &ClientId) -> Option<&mut ClientSession> {
        self.sessions.get_mut(id)
    }

    pub fn contains(&self, id: &ClientId) -> bool {
        self.sessions.contains_key(id)
    }

    /// Removes a session, handing back its record (and transport) if present.
    pub fn remove(&mut self, id: &ClientId) -> Option<ClientSession> {
        self.sessions.remove(id)
    }

    /// Refreshes `last_active_at`. No-op for unknown ids.
    pub fn touch(&mut self, id: &ClientId, now: DateTime<Utc>) {
        if let Some(session) = self.sessions.get_mut(id) {
            session.last_active_at = now;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClientSession> {
        self.sessions.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ClientSession> {
        self.sessions.values_mut()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Removes every session, marking each transport dead.
    pub fn drain(&mut self) -> usize {
        let count = self.sessions.len();
        for (_, session) in self.sessions.drain() {
            session.transport.mark_dead();
        }
        count
    }
}
