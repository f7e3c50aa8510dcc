//! Matchmaking engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Real-time (WebSocket) engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Interval between liveness sweeps in seconds.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
    /// Inactivity after which a client is disconnected, in seconds.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
    /// Outbound frame buffer per connection.
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer_size: usize,
    /// Largest accepted inbound frame in bytes.
    #[serde(default = "default_max_message_bytes")]
    pub max_message_bytes: usize,
    /// Largest accepted `TEXT_MESSAGE.text` in characters.
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            sweep_interval_seconds: default_sweep_interval(),
            idle_timeout_seconds: default_idle_timeout(),
            outbound_buffer_size: default_outbound_buffer(),
            max_message_bytes: default_max_message_bytes(),
            max_text_length: default_max_text_length(),
        }
    }
}

impl RealtimeConfig {
    /// Sweep cadence as a [`Duration`].
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }

    /// Idle threshold as a [`Duration`].
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_seconds)
    }
}

fn default_sweep_interval() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    300
}

fn default_outbound_buffer() -> usize {
    256
}

fn default_max_message_bytes() -> usize {
    65_536
}

fn default_max_text_length() -> usize {
    4_000
}
