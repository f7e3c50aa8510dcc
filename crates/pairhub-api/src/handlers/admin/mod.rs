//! Admin endpoints: operator login/logout and video chat monitoring.

pub mod auth;
pub mod monitor;
