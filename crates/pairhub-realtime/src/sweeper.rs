//! Liveness sweeper: evicts dead and idle clients and expired admin sessions.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, broadcast};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use pairhub_core::types::ClientId;

use crate::hub::HubState;
use crate::metrics::EngineMetrics;

/// Outcome of one sweep pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Clients whose transport had closed.
    pub closed: usize,
    /// Clients idle beyond the threshold.
    pub idle: usize,
    /// Admin sessions past their expiry.
    pub expired_admins: usize,
}

impl SweepReport {
    pub fn is_empty(&self) -> bool {
        self.closed == 0 && self.idle == 0 && self.expired_admins == 0
    }
}

enum Eviction {
    Closed,
    Idle,
}

impl HubState {
    /// Runs one sweep at `now`.
    ///
    /// Evicted clients go through the normal disconnect path, so partners
    /// are told and video sessions end exactly as on a network drop.
    pub fn sweep(&mut self, now: DateTime<Utc>, idle_timeout: chrono::Duration) -> SweepReport {
        let mut report = SweepReport::default();

        let evictions: Vec<(ClientId, Eviction)> = self
            .registry
            .iter()
            .filter_map(|session| {
                if !session.transport().is_open() {
                    Some((session.id, Eviction::Closed))
                } else if now - session.last_active_at > idle_timeout {
                    Some((session.id, Eviction::Idle))
                } else {
                    None
                }
            })
            .collect();

        for (id, reason) in evictions {
            if !self.disconnect(id, now) {
                continue;
            }
            match reason {
                Eviction::Closed => report.closed += 1,
                Eviction::Idle => {
                    debug!(client_id = %id, "Disconnected idle client");
                    report.idle += 1;
                }
            }
            EngineMetrics::incr(&self.metrics.sessions_swept);
        }

        let expired = self.admins.purge_expired(now);
        for admin_id in &expired {
            self.detach_admin(admin_id);
        }
        report.expired_admins = expired.len();

        self.observer_transports.retain(|_, transport| transport.is_open());

        report
    }
}

/// Sweeps `state` every `interval` until `shutdown` fires.
pub(crate) async fn run_sweeper(
    state: Arc<Mutex<HubState>>,
    interval: Duration,
    idle_timeout: chrono::Duration,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let report = state.lock().await.sweep(Utc::now(), idle_timeout);
                if !report.is_empty() {
                    info!(
                        closed = report.closed,
                        idle = report.idle,
                        expired_admins = report.expired_admins,
                        "Liveness sweep evicted sessions"
                    );
                }
            }
            _ = shutdown.recv() => {
                debug!("Liveness sweeper stopping");
                break;
            }
        }
    }
}
