//! Maps file configuration onto the runtime types of `fw-ws`.

use fw_config::Config;
use fw_ws::{BroadcastConfig, ConnectionConfig, SessionLimits};

use std::time::Duration;

pub fn connection_config(config: &Config) -> ConnectionConfig {
    ConnectionConfig {
        send_buffer_size: config.websocket.send_buffer_size,
        heartbeat_interval_secs: config.websocket.heartbeat_interval_secs,
        heartbeat_timeout_secs: config.websocket.heartbeat_timeout_secs,
    }
}

pub fn broadcast_config(config: &Config) -> BroadcastConfig {
    BroadcastConfig {
        heartbeat_prefix: config.broadcast.heartbeat_prefix.clone(),
        send_timeout: match config.broadcast.send_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        },
    }
}

pub fn session_limits(config: &Config) -> SessionLimits {
    SessionLimits {
        max_total: config.server.max_connections,
    }
}
