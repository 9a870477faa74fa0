use crate::{Result as WsErrorResult, Session, SessionId, SessionLimits, SessionView, WsError};

use std::panic::Location;
use std::sync::Arc;

use async_trait::async_trait;
use error_location::ErrorLocation;
use log::{info, warn};
use tokio::sync::RwLock;

/// Registry of open dashboard sessions.
///
/// Sessions are kept in registration order. Readers get a copy of the
/// membership list, so a slow send never holds the registry lock.
pub struct SessionRegistry {
    inner: Arc<RwLock<RegistryInner>>,
    limits: SessionLimits,
}

struct RegistryInner {
    sessions: Vec<Arc<dyn Session>>,
}

impl SessionRegistry {
    pub fn new(limits: SessionLimits) -> Self {
        Self {
            inner: Arc::new(RwLock::new(RegistryInner {
                sessions: Vec::new(),
            })),
            limits,
        }
    }

    /// Register an accepted session, enforcing the total session limit
    pub async fn register(&self, session: Arc<dyn Session>) -> WsErrorResult<SessionId> {
        let mut inner = self.inner.write().await;
        let session_id = session.id();

        if inner.sessions.len() >= self.limits.max_total {
            warn!(
                "Total session limit reached: {}/{}",
                inner.sessions.len(),
                self.limits.max_total
            );
            return Err(WsError::ConnectionLimitExceeded {
                current: inner.sessions.len(),
                max: self.limits.max_total,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if inner.sessions.iter().any(|s| s.id() == session_id) {
            return Err(WsError::DuplicateSession {
                session_id: session_id.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        inner.sessions.push(session);
        info!(
            "Registered session {session_id} ({} total)",
            inner.sessions.len()
        );

        Ok(session_id)
    }

    /// Remove a session. Returns false when it was not registered.
    pub async fn unregister(&self, session_id: SessionId) -> bool {
        let mut inner = self.inner.write().await;
        let before = inner.sessions.len();
        inner.sessions.retain(|s| s.id() != session_id);

        let removed = inner.sessions.len() != before;
        if removed {
            info!(
                "Unregistered session {session_id} ({} total remaining)",
                inner.sessions.len()
            );
        }
        removed
    }

    /// Look up a registered session
    pub async fn get(&self, session_id: SessionId) -> Option<Arc<dyn Session>> {
        let inner = self.inner.read().await;
        inner
            .sessions
            .iter()
            .find(|s| s.id() == session_id)
            .cloned()
    }

    /// Get total session count
    pub async fn total_count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.sessions.len()
    }

    /// Copy of the current membership, in registration order
    pub async fn snapshot(&self) -> Vec<Arc<dyn Session>> {
        let inner = self.inner.read().await;
        inner.sessions.clone()
    }
}

#[async_trait]
impl SessionView for SessionRegistry {
    async fn snapshot(&self) -> Vec<Arc<dyn Session>> {
        SessionRegistry::snapshot(self).await
    }
}

impl Clone for SessionRegistry {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            limits: self.limits.clone(),
        }
    }
}
