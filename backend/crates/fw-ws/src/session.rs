use crate::{BroadcastMessage, Result as WsErrorResult, SessionId};

use std::sync::Arc;

use async_trait::async_trait;

/// A live, bidirectional connection to one dashboard.
///
/// The broadcaster only ever calls `is_open` and `send`. Whoever owns the
/// connection decides when it closes and when it leaves the registry.
#[async_trait]
pub trait Session: Send + Sync {
    fn id(&self) -> SessionId;

    /// Identity the session was accepted under, for log context
    fn identity(&self) -> &str;

    fn is_open(&self) -> bool;

    async fn send(&self, message: &BroadcastMessage) -> WsErrorResult<()>;
}

/// Read access to the set of registered sessions.
///
/// `snapshot` must be safe to call while other tasks register and unregister
/// sessions, and must not leave any lock held once it returns.
#[async_trait]
pub trait SessionView: Send + Sync {
    async fn snapshot(&self) -> Vec<Arc<dyn Session>>;
}
