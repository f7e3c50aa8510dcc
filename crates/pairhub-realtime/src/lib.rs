//! # pairhub-realtime
//!
//! Real-time matchmaking engine for PairHub. Provides:
//!
//! - A session registry for anonymous clients and their transports
//! - FIFO text and video waiting pools with a pairing engine
//! - Verbatim relay of chat and WebRTC signaling frames between partners
//! - Admin observation of video chats with mirrored signaling
//! - A liveness sweeper for dead and idle connections
//!
//! All shared state lives in [`hub::HubState`], guarded by a single lock
//! inside [`RealtimeEngine`].

pub mod admin;
pub mod connection;
pub mod hub;
pub mod message;
pub mod metrics;
pub mod server;
pub mod sweeper;

pub use admin::MonitorError;
pub use connection::ConnectionHandle;
pub use hub::{HubState, SessionInfo, VideoSession};
pub use message::{ChatMode, InboundMessage, OutboundMessage, ValidationError};
pub use metrics::{EngineMetrics, MetricsSnapshot};
pub use server::RealtimeEngine;
pub use sweeper::SweepReport;
