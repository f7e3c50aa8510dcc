//! Per-connection transport handles.

pub mod handle;

pub use handle::{ConnectionHandle, ConnectionId};
