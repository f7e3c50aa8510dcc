//! Admin monitoring: operator sessions, chat listing, observer attachment.

pub mod monitor;
pub mod observers;

pub use monitor::MonitorError;
