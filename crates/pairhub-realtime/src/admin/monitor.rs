//! Admin monitoring operations on video chats.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

use pairhub_auth::AdminSession;
use pairhub_core::error::AppError;
use pairhub_core::types::{AdminSessionId, ChatId};

use crate::hub::{HubState, VideoSession};
use crate::metrics::EngineMetrics;

/// Failure of an admin monitoring call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MonitorError {
    /// Unknown or expired admin session, or a failed login.
    #[error("Unauthorized")]
    Unauthorized,
    /// The video chat no longer exists.
    #[error("Video chat not found")]
    NotFound,
}

impl From<MonitorError> for AppError {
    fn from(err: MonitorError) -> Self {
        match err {
            MonitorError::Unauthorized => AppError::unauthorized(err.to_string()),
            MonitorError::NotFound => AppError::not_found(err.to_string()),
        }
    }
}

impl HubState {
    /// Opens a new admin session. Credentials are checked by the caller.
    pub fn create_admin_session(&mut self, now: DateTime<Utc>) -> AdminSession {
        let session = self.admins.create(now);
        EngineMetrics::incr(&self.metrics.admin_logins);
        info!(admin_session = %session.id, expires_at = %session.expires_at, "Admin session created");
        session
    }

    pub(crate) fn require_admin(&self, admin_id: &AdminSessionId, now: DateTime<Utc>) -> Result<(), MonitorError> {
        if self.admins.is_valid(admin_id, now) {
            Ok(())
        } else {
            Err(MonitorError::Unauthorized)
        }
    }

    /// Active video chats, oldest first.
    pub fn list_active_video_sessions(
        &self,
        admin_id: &AdminSessionId,
        now: DateTime<Utc>,
    ) -> Result<Vec<VideoSession>, MonitorError> {
        self.require_admin(admin_id, now)?;
        Ok(self.video_sessions.list())
    }

    /// Starts mirroring both sides' signaling of `chat_id` to `admin_id`.
    ///
    /// A chat whose clients have vanished is deleted and reported as `NotFound`.
    pub fn start_monitoring(
        &mut self,
        admin_id: AdminSessionId,
        chat_id: ChatId,
        now: DateTime<Utc>,
    ) -> Result<(), MonitorError> {
        self.require_admin(&admin_id, now)?;

        let Some(chat) = self.video_sessions.get(&chat_id).cloned() else {
            return Err(MonitorError::NotFound);
        };

        if !self.registry.contains(&chat.client_a) || !self.registry.contains(&chat.client_b) {
            self.video_sessions.remove(&chat_id);
            warn!(chat_id = %chat_id, "Removed stale video session");
            return Err(MonitorError::NotFound);
        }

        for id in [chat.client_a, chat.client_b] {
            if let Some(session) = self.registry.get_mut(&id) {
                session.observers.insert(admin_id);
            }
        }

        info!(admin_session = %admin_id, chat_id = %chat_id, "Monitoring started");
        Ok(())
    }

    /// Stops mirroring `chat_id` to `admin_id`. Safe to repeat.
    ///
    /// Each side stops being monitored once its own observer set is empty.
    pub fn stop_monitoring(
        &mut self,
        admin_id: AdminSessionId,
        chat_id: ChatId,
        now: DateTime<Utc>,
    ) -> Result<(), MonitorError> {
        self.require_admin(&admin_id, now)?;

        let Some(chat) = self.video_sessions.get(&chat_id).cloned() else {
            return Err(MonitorError::NotFound);
        };

        for id in [chat.client_a, chat.client_b] {
            if let Some(session) = self.registry.get_mut(&id) {
                session.observers.remove(&admin_id);
            }
        }

        info!(admin_session = %admin_id, chat_id = %chat_id, "Monitoring stopped");
        Ok(())
    }

    /// Ends an admin session early, detaching it everywhere.
    pub fn logout(&mut self, admin_id: AdminSessionId, now: DateTime<Utc>) -> Result<(), MonitorError> {
        self.require_admin(&admin_id, now)?;
        self.admins.remove(&admin_id);
        self.detach_admin(&admin_id);
        info!(admin_session = %admin_id, "Admin logged out");
        Ok(())
    }
}
