//! Active video chat records used for admin discovery.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pairhub_core::types::{ChatId, ClientId};

/// One active video pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSession {
    pub id: ChatId,
    pub client_a: ClientId,
    pub client_b: ClientId,
    pub created_at: DateTime<Utc>,
}

impl VideoSession {
    /// Whether this chat is between `a` and `b`, in either order.
    pub fn is_between(&self, a: &ClientId, b: &ClientId) -> bool {
        (self.client_a == *a && self.client_b == *b) || (self.client_a == *b && self.client_b == *a)
    }
}

/// Table of active video sessions keyed by chat id.
#[derive(Debug, Default)]
pub struct VideoSessionTable {
    sessions: HashMap<ChatId, VideoSession>,
}

impl VideoSessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new chat between `a` and `b` under a fresh id.
    pub fn insert(&mut self, a: ClientId, b: ClientId, now: DateTime<Utc>) -> ChatId {
        let id = ChatId::new();
        self.sessions.insert(
            id,
            VideoSession {
                id,
                client_a: a,
                client_b: b,
                created_at: now,
            },
        );
        id
    }

    pub fn get(&self, id: &ChatId) -> Option<&VideoSession> {
        self.sessions.get(id)
    }

    pub fn remove(&mut self, id: &ChatId) -> Option<VideoSession> {
        self.sessions.remove(id)
    }

    /// Finds the chat between two clients, order-independent.
    pub fn find_between(&self, a: &ClientId, b: &ClientId) -> Option<ChatId> {
        self.sessions
            .values()
            .find(|s| s.is_between(a, b))
            .map(|s| s.id)
    }

    /// All chats, oldest first.
    pub fn list(&self) -> Vec<VideoSession> {
        let mut list: Vec<VideoSession> = self.sessions.values().cloned().collect();
        list.sort_by(|x, y| x.created_at.cmp(&y.created_at).then(x.id.cmp(&y.id)));
        list
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn clear(&mut self) {
        self.sessions.clear();
    }
}
