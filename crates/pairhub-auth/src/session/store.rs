//! In-memory admin session storage with explicit expiry.
//!
//! The store is not internally synchronized: it lives inside the realtime
//! engine's state and is only touched while that state is locked. Every
//! time-dependent call takes `now` so sweeps and tests stay deterministic.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use pairhub_core::config::AdminConfig;
use pairhub_core::types::AdminSessionId;

/// Upper bound on the configured lifetime (one hundred years).
const MAX_TTL_MINUTES: i64 = 100 * 365 * 24 * 60;

/// An authenticated operator context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    /// Opaque session token handed to the operator.
    pub id: AdminSessionId,
    /// When the login succeeded.
    pub created_at: DateTime<Utc>,
    /// After this instant the session is treated as unknown.
    pub expires_at: DateTime<Utc>,
}

impl AdminSession {
    /// Whether the session is still usable at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// The process-wide set of operator sessions.
#[derive(Debug)]
pub struct AdminSessionStore {
    sessions: HashMap<AdminSessionId, AdminSession>,
    ttl: Duration,
}

impl AdminSessionStore {
    /// Creates an empty store issuing sessions that live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            ttl,
        }
    }

    /// Creates an empty store using `admin.session_ttl_minutes`.
    pub fn from_config(config: &AdminConfig) -> Self {
        let minutes = i64::try_from(config.session_ttl_minutes)
            .unwrap_or(MAX_TTL_MINUTES)
            .min(MAX_TTL_MINUTES);
        Self::new(Duration::minutes(minutes))
    }

    /// Issues a new session starting at `now`.
    pub fn create(&mut self, now: DateTime<Utc>) -> AdminSession {
        let session = AdminSession {
            id: AdminSessionId::new(),
            created_at: now,
            expires_at: now + self.ttl,
        };
        self.sessions.insert(session.id, session.clone());
        session
    }

    /// Returns the session if it exists and has not expired.
    pub fn get_valid(&self, id: &AdminSessionId, now: DateTime<Utc>) -> Option<&AdminSession> {
        self.sessions.get(id).filter(|s| s.is_valid_at(now))
    }

    /// Whether `id` names a live session at `now`.
    pub fn is_valid(&self, id: &AdminSessionId, now: DateTime<Utc>) -> bool {
        self.get_valid(id, now).is_some()
    }

    /// Removes a session. Returns it if it was present.
    pub fn remove(&mut self, id: &AdminSessionId) -> Option<AdminSession> {
        self.sessions.remove(id)
    }

    /// Drops every session expired at `now` and returns their ids.
    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> Vec<AdminSessionId> {
        let expired: Vec<AdminSessionId> = self
            .sessions
            .values()
            .filter(|s| !s.is_valid_at(now))
            .map(|s| s.id)
            .collect();

        for id in &expired {
            self.sessions.remove(id);
        }
        expired
    }

    /// Number of stored sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Forgets every session.
    pub fn clear(&mut self) {
        self.sessions.clear();
    }
}
