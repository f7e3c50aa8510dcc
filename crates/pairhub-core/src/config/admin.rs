//! Operator (admin) login configuration.

use serde::{Deserialize, Serialize};

/// Operator credential and session settings.
///
/// The password is never stored in plain text: `password_hash` holds an
/// Argon2 PHC string, normally supplied through `PAIRHUB__ADMIN__PASSWORD_HASH`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Argon2 PHC hash of the operator password. Empty disables login.
    #[serde(default)]
    pub password_hash: String,
    /// Lifetime of an operator session in minutes.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_minutes: u64,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            password_hash: String::new(),
            session_ttl_minutes: default_session_ttl(),
        }
    }
}

fn default_session_ttl() -> u64 {
    480
}
