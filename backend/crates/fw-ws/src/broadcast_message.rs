use std::fmt;
use std::sync::Arc;

/// An opaque text payload fanned out to every open session.
/// Cloning is cheap; all sessions share one allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastMessage {
    payload: Arc<str>,
}

impl BroadcastMessage {
    pub fn new(payload: impl Into<Arc<str>>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.payload
    }

    /// Periodic node-metrics messages are delivered like any other message
    /// but are not announced in the log.
    pub fn is_heartbeat(&self, prefix: &str) -> bool {
        self.payload.starts_with(prefix)
    }
}

impl From<String> for BroadcastMessage {
    fn from(payload: String) -> Self {
        Self::new(payload)
    }
}

impl From<&str> for BroadcastMessage {
    fn from(payload: &str) -> Self {
        Self::new(payload)
    }
}

impl fmt::Display for BroadcastMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.payload)
    }
}
