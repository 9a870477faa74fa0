pub mod app_state;
pub mod broadcast_config;
pub mod broadcast_message;
pub mod broadcaster;
pub mod connection_config;
pub mod error;
pub mod message_queue;
pub mod metrics;
pub mod metrics_timer;
pub mod session;
pub mod session_id;
pub mod session_info;
pub mod session_limits;
pub mod session_registry;
pub mod shutdown_coordinator;
pub mod shutdown_guard;
pub mod web_socket_connection;
pub mod web_socket_session;

pub use app_state::{ANONYMOUS_IDENTITY, AppState, IDENTITY_HEADER, extract_identity, handler};
pub use broadcast_config::BroadcastConfig;
pub use broadcast_message::BroadcastMessage;
pub use broadcaster::{
    BroadcastReport, Broadcaster, BroadcasterHandle, BroadcasterStatus, ExitReason,
};
pub use connection_config::ConnectionConfig;
pub use error::{Result, WsError};
pub use message_queue::{MessageQueue, MessageSender, Take, message_queue};
pub use metrics::Metrics;
pub use metrics_timer::MetricsTimer;
pub use session::{Session, SessionView};
pub use session_id::SessionId;
pub use session_info::SessionInfo;
pub use session_limits::SessionLimits;
pub use session_registry::SessionRegistry;
pub use shutdown_coordinator::ShutdownCoordinator;
pub use shutdown_guard::ShutdownGuard;
pub use web_socket_connection::WebSocketConnection;
pub use web_socket_session::WebSocketSession;

#[cfg(test)]
mod tests;

use tracing::info_span;

/// Create a tracing span for one dashboard session.
/// All log entries within the connection task will include these fields.
pub fn create_session_span(session_id: &SessionId, identity: &str) -> tracing::Span {
    info_span!(
        "ws_session",
        session_id = %session_id,
        identity = %identity,
    )
}
