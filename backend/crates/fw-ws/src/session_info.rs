use crate::SessionId;

use chrono::{DateTime, Utc};

/// Information about an accepted dashboard session
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub session_id: SessionId,
    /// Identity asserted by the authenticating front end
    pub identity: String,
    pub connected_at: DateTime<Utc>,
}

impl SessionInfo {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            session_id: SessionId::new(),
            identity: identity.into(),
            connected_at: Utc::now(),
        }
    }
}
