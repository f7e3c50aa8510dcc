//! # pairhub-auth
//!
//! Operator authentication and admin session lifecycle for PairHub.
//!
//! ## Modules
//!
//! - `password`: Argon2id password hashing and the pluggable authenticator
//! - `session`: In-memory admin session store with explicit expiry

pub mod password;
pub mod session;

pub use password::{AdminAuthenticator, Argon2Authenticator, PasswordHasher};
pub use session::{AdminSession, AdminSessionStore};
