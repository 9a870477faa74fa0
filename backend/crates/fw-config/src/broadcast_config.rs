use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_HEARTBEAT_PREFIX, DEFAULT_QUEUE_CAPACITY,
    DEFAULT_SEND_TIMEOUT_MS, MAX_QUEUE_CAPACITY, MAX_SEND_TIMEOUT_MS, MIN_QUEUE_CAPACITY,
};

use serde::Deserialize;

/// Settings for the message queue and the broadcaster worker.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BroadcastConfig {
    /// Messages buffered between the event source and the broadcaster
    pub queue_capacity: usize,
    /// Messages starting with this prefix are not announced in the log
    pub heartbeat_prefix: String,
    /// Upper bound for a single session send in milliseconds (0 = unbounded)
    pub send_timeout_ms: u64,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            heartbeat_prefix: String::from(DEFAULT_HEARTBEAT_PREFIX),
            send_timeout_ms: DEFAULT_SEND_TIMEOUT_MS,
        }
    }
}

impl BroadcastConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.queue_capacity < MIN_QUEUE_CAPACITY || self.queue_capacity > MAX_QUEUE_CAPACITY {
            return Err(ConfigError::broadcast(format!(
                "broadcast.queue_capacity must be {}-{}, got {}",
                MIN_QUEUE_CAPACITY, MAX_QUEUE_CAPACITY, self.queue_capacity
            )));
        }

        if self.heartbeat_prefix.is_empty() {
            return Err(ConfigError::broadcast(
                "broadcast.heartbeat_prefix cannot be empty",
            ));
        }

        if self.send_timeout_ms > MAX_SEND_TIMEOUT_MS {
            return Err(ConfigError::broadcast(format!(
                "broadcast.send_timeout_ms must be 0-{}, got {}",
                MAX_SEND_TIMEOUT_MS, self.send_timeout_ms
            )));
        }

        Ok(())
    }
}
