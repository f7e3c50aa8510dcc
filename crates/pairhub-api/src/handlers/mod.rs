//! HTTP and WebSocket handlers.

pub mod admin;
pub mod health;
pub mod ws;
