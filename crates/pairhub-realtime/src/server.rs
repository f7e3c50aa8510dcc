//! Top-level real-time engine that owns the shared state and its lifecycle.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use pairhub_auth::AdminAuthenticator;
use pairhub_core::config::{AdminConfig, RealtimeConfig};
use pairhub_core::types::{AdminSessionId, ChatId, ClientId};

use crate::admin::MonitorError;
use crate::connection::{ConnectionHandle, ConnectionId};
use crate::hub::{HubState, SessionInfo, VideoSession};
use crate::message::types::ChatMode;
use crate::metrics::EngineMetrics;
use crate::sweeper::{self, SweepReport};

/// Central real-time engine.
///
/// Every public operation takes the state lock once and holds it for
/// the whole mutation, so operations never interleave.
#[derive(Clone)]
pub struct RealtimeEngine {
    state: Arc<Mutex<HubState>>,
    authenticator: Arc<dyn AdminAuthenticator>,
    config: RealtimeConfig,
    /// Metrics collector.
    pub metrics: Arc<EngineMetrics>,
    shutdown_tx: broadcast::Sender<()>,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine").finish()
    }
}

impl RealtimeEngine {
    /// Creates an engine with empty state.
    pub fn new(
        config: RealtimeConfig,
        admin: &AdminConfig,
        authenticator: Arc<dyn AdminAuthenticator>,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        let metrics = Arc::new(EngineMetrics::new());
        let state = HubState::new(&config, admin, metrics.clone());

        info!(
            sweep_interval_seconds = config.sweep_interval_seconds,
            idle_timeout_seconds = config.idle_timeout_seconds,
            "Real-time engine initialized"
        );

        Self {
            state: Arc::new(Mutex::new(state)),
            authenticator,
            config,
            metrics,
            shutdown_tx,
        }
    }

    /// Outbound buffer size for new connection handles.
    pub fn outbound_buffer_size(&self) -> usize {
        self.config.outbound_buffer_size
    }

    fn idle_timeout(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.config.idle_timeout()).unwrap_or(chrono::Duration::days(36_500))
    }

    /// Spawns the liveness sweeper. It stops on [`Self::shutdown`].
    pub fn start_sweeper(&self) -> JoinHandle<()> {
        info!(interval_seconds = self.config.sweep_interval_seconds, "Starting liveness sweeper");
        tokio::spawn(sweeper::run_sweeper(
            self.state.clone(),
            self.config.sweep_interval(),
            self.idle_timeout(),
            self.shutdown_tx.subscribe(),
        ))
    }

    /// Runs one sweep immediately.
    pub async fn sweep_now(&self) -> SweepReport {
        self.state.lock().await.sweep(Utc::now(), self.idle_timeout())
    }

    /// Stops the sweeper, closes every transport and clears all state.
    pub async fn shutdown(&self) {
        info!("Shutting down real-time engine");
        let _ = self.shutdown_tx.send(());
        self.state.lock().await.clear();
        info!("Real-time engine shut down");
    }

    // ── Client connections ──────────────────────────────────────────

    /// Registers a client connection and sends it `JOIN`.
    pub async fn connect(&self, transport: ConnectionHandle) -> ClientId {
        self.state.lock().await.connect(transport, Utc::now())
    }

    /// Processes one raw inbound frame from a client.
    pub async fn handle_inbound(&self, from: ClientId, raw: &str) {
        self.state.lock().await.handle_inbound(from, raw, Utc::now());
    }

    /// Processes one raw binary frame from a client.
    pub async fn handle_inbound_bytes(&self, from: ClientId, bytes: &[u8]) {
        self.state
            .lock()
            .await
            .handle_inbound_bytes(from, bytes, Utc::now());
    }

    /// Handles a closed client transport. Idempotent.
    pub async fn disconnect(&self, id: ClientId) -> bool {
        self.state.lock().await.disconnect(id, Utc::now())
    }

    /// Number of registered client sessions.
    pub async fn connection_count(&self) -> usize {
        self.state.lock().await.registry().len()
    }

    /// Snapshot of one client session.
    pub async fn session_info(&self, id: &ClientId) -> Option<SessionInfo> {
        self.state.lock().await.registry().get(id).map(|s| s.info())
    }

    /// Clients waiting in the `mode` pool, oldest first.
    pub async fn waiting(&self, mode: ChatMode) -> Vec<ClientId> {
        self.state.lock().await.pools().waiting(mode)
    }

    /// Broken structural invariants, if any.
    pub async fn invariant_violations(&self) -> Vec<String> {
        self.state.lock().await.invariant_violations()
    }

    // ── Admin monitoring ────────────────────────────────────────────

    /// Checks the operator password and opens an admin session.
    ///
    /// The credential check runs before the state lock is taken.
    pub async fn login(&self, password: &str) -> Result<AdminSessionId, MonitorError> {
        if !self.authenticator.verify(password).await {
            warn!("Rejected operator login");
            return Err(MonitorError::Unauthorized);
        }
        Ok(self.state.lock().await.create_admin_session(Utc::now()).id)
    }

    /// Whether `admin_id` is a live admin session.
    pub async fn is_admin(&self, admin_id: &AdminSessionId) -> bool {
        self.state.lock().await.admins().is_valid(admin_id, Utc::now())
    }

    pub async fn list_active_video_sessions(
        &self,
        admin_id: &AdminSessionId,
    ) -> Result<Vec<VideoSession>, MonitorError> {
        self.state
            .lock()
            .await
            .list_active_video_sessions(admin_id, Utc::now())
    }

    pub async fn start_monitoring(&self, admin_id: AdminSessionId, chat_id: ChatId) -> Result<(), MonitorError> {
        self.state.lock().await.start_monitoring(admin_id, chat_id, Utc::now())
    }

    pub async fn stop_monitoring(&self, admin_id: AdminSessionId, chat_id: ChatId) -> Result<(), MonitorError> {
        self.state.lock().await.stop_monitoring(admin_id, chat_id, Utc::now())
    }

    pub async fn logout(&self, admin_id: AdminSessionId) -> Result<(), MonitorError> {
        self.state.lock().await.logout(admin_id, Utc::now())
    }

    /// Binds an observer socket to an admin session.
    pub async fn attach_observer(
        &self,
        admin_id: AdminSessionId,
        transport: ConnectionHandle,
    ) -> Result<ConnectionId, MonitorError> {
        self.state
            .lock()
            .await
            .attach_observer_transport(admin_id, transport, Utc::now())
    }

    /// Unbinds an observer socket after it closes.
    pub async fn detach_observer(&self, admin_id: &AdminSessionId, connection_id: ConnectionId) {
        self.state
            .lock()
            .await
            .detach_observer_transport(admin_id, connection_id);
    }

    /// Processes one raw frame from an observer socket.
    pub async fn handle_admin_inbound(&self, admin_id: &AdminSessionId, raw: &str) {
        self.state.lock().await.handle_admin_inbound(admin_id, raw);
    }
}
