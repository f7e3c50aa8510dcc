//! Admin session lifecycle.

pub mod store;

pub use store::{AdminSession, AdminSessionStore};
