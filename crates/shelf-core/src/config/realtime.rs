//! Change-feed configuration.

use serde::{Deserialize, Serialize};

/// Change-feed (realtime) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Internal channel buffer size for broadcast channels.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// PostgreSQL `LISTEN` channel the table triggers notify on.
    #[serde(default = "default_notify_channel")]
    pub notify_channel: String,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: default_channel_buffer(),
            notify_channel: default_notify_channel(),
        }
    }
}

fn default_channel_buffer() -> usize {
    256
}

fn default_notify_channel() -> String {
    "shelf_changes".to_string()
}
