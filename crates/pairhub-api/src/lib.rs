//! # pairhub-api
//!
//! HTTP layer for PairHub built on Axum.
//!
//! Provides the client and admin WebSocket upgrades, the admin REST
//! endpoints, the status endpoint, middleware (CORS, logging), DTOs,
//! extractors, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use state::AppState;
