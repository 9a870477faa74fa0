use std::time::Duration;

pub const DEFAULT_HEARTBEAT_PREFIX: &str = "{node_metrics";

/// Configuration for the broadcaster worker
#[derive(Debug, Clone)]
pub struct BroadcastConfig {
    /// Messages starting with this prefix are not announced in the log
    pub heartbeat_prefix: String,
    /// Upper bound for a single session send (None = unbounded)
    pub send_timeout: Option<Duration>,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            heartbeat_prefix: String::from(DEFAULT_HEARTBEAT_PREFIX),
            send_timeout: None,
        }
    }
}
