use crate::{
    ConnectionConfig, Metrics, Session, SessionInfo, SessionRegistry, ShutdownCoordinator,
    WebSocketConnection, WebSocketSession, WsError, create_session_span,
};

use std::panic::Location;
use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode},
    response::Response,
};
use error_location::ErrorLocation;
use log::{debug, error, info, warn};
use tokio::sync::mpsc;
use tracing::Instrument;

/// Header carrying the identity established by the authenticating front end
pub const IDENTITY_HEADER: &str = "x-authenticated-user";

/// Identity given to sessions when identity is optional and none was asserted
pub const ANONYMOUS_IDENTITY: &str = "anonymous";

/// Shared application state for the WebSocket endpoint
#[derive(Clone)]
pub struct AppState {
    pub registry: SessionRegistry,
    pub metrics: Metrics,
    pub shutdown: ShutdownCoordinator,
    pub config: ConnectionConfig,
    pub require_identity: bool,
}

/// WebSocket upgrade handler.
///
/// The session is registered before the upgrade completes, so it is visible
/// to the broadcaster as soon as the client is connected.
pub async fn handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Result<Response, StatusCode> {
    if state.shutdown.is_shutdown() {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    let identity = extract_identity(&headers, state.require_identity).map_err(|e| {
        warn!("Rejected WebSocket upgrade: {e}");
        StatusCode::UNAUTHORIZED
    })?;
    debug!("WebSocket upgrade request from {identity}");

    let (outbound_tx, outbound_rx) = mpsc::channel::<Message>(state.config.send_buffer_size.max(1));
    let session = Arc::new(WebSocketSession::new(
        SessionInfo::new(identity),
        outbound_tx.clone(),
    ));

    let session_id = state
        .registry
        .register(session.clone())
        .await
        .map_err(|e| {
            error!("Failed to register session: {e}");
            StatusCode::SERVICE_UNAVAILABLE
        })?;

    info!("Accepted session {session_id}");

    let registry = state.registry.clone();
    Ok(ws
        .on_failed_upgrade(move |e| {
            warn!("WebSocket upgrade for session {session_id} failed: {e}");
            tokio::spawn(async move {
                registry.unregister(session_id).await;
            });
        })
        .on_upgrade(move |socket| handle_socket(socket, session, outbound_tx, outbound_rx, state)))
}

/// Handle WebSocket connection after upgrade
async fn handle_socket(
    socket: WebSocket,
    session: Arc<WebSocketSession>,
    outbound_tx: mpsc::Sender<Message>,
    outbound_rx: mpsc::Receiver<Message>,
    state: AppState,
) {
    let session_id = session.id();
    let span = create_session_span(&session_id, session.identity());
    let shutdown_guard = state.shutdown.subscribe_guard();

    let connection = WebSocketConnection::new(
        session,
        outbound_tx,
        outbound_rx,
        state.config.clone(),
        state.metrics.clone(),
    );

    let result = connection.handle(socket, shutdown_guard).instrument(span).await;

    state.registry.unregister(session_id).await;

    if let Err(e) = result {
        error!("Session {session_id} error: {e}");
    }
}

/// Read the identity asserted upstream.
///
/// Credentials are verified by the front end; this only refuses callers that
/// arrive without an identity when one is required.
#[track_caller]
pub fn extract_identity(headers: &HeaderMap, require_identity: bool) -> Result<String, WsError> {
    let asserted = headers
        .get(IDENTITY_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|identity| !identity.is_empty());

    match asserted {
        Some(identity) => Ok(identity.to_string()),
        None if require_identity => Err(WsError::Unauthorized {
            message: format!("missing {IDENTITY_HEADER} header"),
            location: ErrorLocation::from(Location::caller()),
        }),
        None => Ok(String::from(ANONYMOUS_IDENTITY)),
    }
}
