//! Password hashing and operator credential checks.

pub mod authenticator;
pub mod hasher;

pub use authenticator::{AdminAuthenticator, Argon2Authenticator};
pub use hasher::PasswordHasher;
