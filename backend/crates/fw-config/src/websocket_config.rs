use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_HEARTBEAT_INTERVAL_SECS,
    DEFAULT_HEARTBEAT_TIMEOUT_SECS, DEFAULT_SEND_BUFFER_SIZE, MAX_HEARTBEAT_INTERVAL_SECS,
    MAX_HEARTBEAT_TIMEOUT_SECS, MAX_SEND_BUFFER_SIZE, MIN_HEARTBEAT_INTERVAL_SECS,
    MIN_PINGS_PER_TIMEOUT, MIN_SEND_BUFFER_SIZE,
};

use serde::Deserialize;

/// Settings for each dashboard session on `/ws`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebSocketConfig {
    /// Frames queued for one dashboard before its sends start failing
    pub send_buffer_size: usize,
    /// Seconds between server pings
    pub heartbeat_interval_secs: u64,
    /// Seconds of dashboard silence before the session is dropped
    pub heartbeat_timeout_secs: u64,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            send_buffer_size: DEFAULT_SEND_BUFFER_SIZE,
            heartbeat_interval_secs: DEFAULT_HEARTBEAT_INTERVAL_SECS,
            heartbeat_timeout_secs: DEFAULT_HEARTBEAT_TIMEOUT_SECS,
        }
    }
}

impl WebSocketConfig {
    /// Pings a dashboard can miss before the timeout drops it
    pub fn missed_pings_tolerated(&self) -> u64 {
        (self.heartbeat_timeout_secs / self.heartbeat_interval_secs.max(1)).saturating_sub(1)
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        check_range(
            "send_buffer_size",
            self.send_buffer_size,
            MIN_SEND_BUFFER_SIZE,
            MAX_SEND_BUFFER_SIZE,
        )?;
        check_range(
            "heartbeat_interval_secs",
            self.heartbeat_interval_secs,
            MIN_HEARTBEAT_INTERVAL_SECS,
            MAX_HEARTBEAT_INTERVAL_SECS,
        )?;

        // A dashboard must survive one lost pong
        let min_timeout = self.heartbeat_interval_secs * MIN_PINGS_PER_TIMEOUT;
        check_range(
            "heartbeat_timeout_secs",
            self.heartbeat_timeout_secs,
            min_timeout,
            MAX_HEARTBEAT_TIMEOUT_SECS,
        )
        .map_err(|_| {
            ConfigError::websocket(format!(
                "websocket.heartbeat_timeout_secs must cover {} pings at {}s ({}-{}), got {}",
                MIN_PINGS_PER_TIMEOUT,
                self.heartbeat_interval_secs,
                min_timeout,
                MAX_HEARTBEAT_TIMEOUT_SECS,
                self.heartbeat_timeout_secs
            ))
        })
    }
}

fn check_range<T>(field: &str, value: T, min: T, max: T) -> ConfigErrorResult<()>
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min || value > max {
        return Err(ConfigError::websocket(format!(
            "websocket.{field} must be {min}-{max}, got {value}"
        )));
    }
    Ok(())
}
