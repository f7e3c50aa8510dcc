//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use pairhub_auth::{AdminAuthenticator, Argon2Authenticator};
use pairhub_core::config::AppConfig;
use pairhub_realtime::RealtimeEngine;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Matchmaking engine
    pub realtime: RealtimeEngine,
}

impl AppState {
    /// Builds state with an explicit authenticator.
    pub fn new(config: AppConfig, authenticator: Arc<dyn AdminAuthenticator>) -> Self {
        let realtime = RealtimeEngine::new(config.realtime.clone(), &config.admin, authenticator);
        Self {
            config: Arc::new(config),
            realtime,
        }
    }

    /// Builds state that checks operator logins against `admin.password_hash`.
    pub fn from_config(config: AppConfig) -> Self {
        let authenticator = Arc::new(Argon2Authenticator::from_config(&config.admin));
        Self::new(config, authenticator)
    }
}
