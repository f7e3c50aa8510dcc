//! Realtime engine metrics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Engine-level metrics counters.
#[derive(Debug, Default)]
pub struct EngineMetrics {
    /// Client connections registered
    pub connections_opened: AtomicU64,
    /// Client connections removed from the registry
    pub connections_closed: AtomicU64,
    /// Inbound client frames processed
    pub messages_received: AtomicU64,
    /// Frames forwarded to a partner
    pub messages_relayed: AtomicU64,
    /// Frames mirrored to admin observers
    pub messages_mirrored: AtomicU64,
    /// Successful pairings
    pub pairings_made: AtomicU64,
    /// Sessions disconnected by the liveness sweeper
    pub sessions_swept: AtomicU64,
    /// Successful operator logins
    pub admin_logins: AtomicU64,
}

impl EngineMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment a counter by one.
    pub fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_opened: self.connections_opened.load(Ordering::Relaxed),
            connections_closed: self.connections_closed.load(Ordering::Relaxed),
            messages_received: self.messages_received.load(Ordering::Relaxed),
            messages_relayed: self.messages_relayed.load(Ordering::Relaxed),
            messages_mirrored: self.messages_mirrored.load(Ordering::Relaxed),
            pairings_made: self.pairings_made.load(Ordering::Relaxed),
            sessions_swept: self.sessions_swept.load(Ordering::Relaxed),
            admin_logins: self.admin_logins.load(Ordering::Relaxed),
        }
    }
}

/// Serializable snapshot of metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Client connections registered
    pub connections_opened: u64,
    /// Client connections removed
    pub connections_closed: u64,
    /// Inbound client frames processed
    pub messages_received: u64,
    /// Frames forwarded to a partner
    pub messages_relayed: u64,
    /// Frames mirrored to admin observers
    pub messages_mirrored: u64,
    /// Successful pairings
    pub pairings_made: u64,
    /// Sessions disconnected by the sweeper
    pub sessions_swept: u64,
    /// Successful operator logins
    pub admin_logins: u64,
}
