//! Operator credential verification.
//!
//! The realtime engine only asks "does this password grant operator
//! access?"; where the credential lives is up to the implementation.

use async_trait::async_trait;
use tracing::{error, warn};

use pairhub_core::config::AdminConfig;

use super::hasher::PasswordHasher;

/// Verifies operator passwords against an external credential store.
#[async_trait]
pub trait AdminAuthenticator: Send + Sync + 'static {
    /// Returns `true` if `password` grants operator access.
    async fn verify(&self, password: &str) -> bool;
}

/// Checks passwords against a single Argon2 PHC hash from configuration.
#[derive(Debug, Clone)]
pub struct Argon2Authenticator {
    password_hash: Option<String>,
    hasher: PasswordHasher,
}

impl Argon2Authenticator {
    /// Creates an authenticator for the given PHC hash.
    ///
    /// A blank hash yields an authenticator that rejects every password.
    pub fn new(password_hash: impl Into<String>) -> Self {
        let hash = password_hash.into();
        let password_hash = if hash.trim().is_empty() {
            None
        } else {
            Some(hash.trim().to_string())
        };

        Self {
            password_hash,
            hasher: PasswordHasher::new(),
        }
    }

    /// Builds the authenticator from the `[admin]` config section.
    pub fn from_config(config: &AdminConfig) -> Self {
        let auth = Self::new(config.password_hash.clone());
        if !auth.is_configured() {
            warn!("admin.password_hash is not set; every operator login will be rejected");
        }
        auth
    }

    /// Whether an operator credential is configured at all.
    pub fn is_configured(&self) -> bool {
        self.password_hash.is_some()
    }
}

#[async_trait]
impl AdminAuthenticator for Argon2Authenticator {
    async fn verify(&self, password: &str) -> bool {
        let Some(hash) = self.password_hash.clone() else {
            return false;
        };

        let hasher = self.hasher.clone();
        let password = password.to_string();

        // Argon2 is deliberately slow; keep it off the async workers.
        let outcome =
            tokio::task::spawn_blocking(move || hasher.verify_password(&password, &hash)).await;

        match outcome {
            Ok(Ok(matched)) => matched,
            Ok(Err(e)) => {
                error!(error = %e, "Operator password verification failed");
                false
            }
            Err(e) => {
                error!(error = %e, "Password verification task panicked");
                false
            }
        }
    }
}
