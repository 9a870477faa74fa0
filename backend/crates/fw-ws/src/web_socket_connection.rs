use crate::{
    ConnectionConfig, Metrics, Result as WsErrorResult, Session, ShutdownGuard, WebSocketSession,
    WsError,
};

use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use bytes::Bytes;
use error_location::ErrorLocation;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{Instant, interval_at, timeout};

/// How long the writer gets to flush the close frame
const CLOSE_FLUSH_TIMEOUT: Duration = Duration::from_secs(1);

/// Drives a single dashboard WebSocket
pub struct WebSocketConnection {
    session: Arc<WebSocketSession>,
    outbound_rx: mpsc::Receiver<Message>,
    outbound_tx: mpsc::Sender<Message>,
    config: ConnectionConfig,
    metrics: Metrics,
}

impl WebSocketConnection {
    /// `outbound_rx` must be the receiving end of the session's frame buffer
    pub fn new(
        session: Arc<WebSocketSession>,
        outbound_tx: mpsc::Sender<Message>,
        outbound_rx: mpsc::Receiver<Message>,
        config: ConnectionConfig,
        metrics: Metrics,
    ) -> Self {
        Self {
            session,
            outbound_rx,
            outbound_tx,
            config,
            metrics,
        }
    }

    /// Handle the connection until the client leaves, the heartbeat lapses
    /// or the server shuts down. The session is closed on return.
    pub async fn handle(
        self,
        socket: WebSocket,
        mut shutdown_guard: ShutdownGuard,
    ) -> WsErrorResult<()> {
        let Self {
            session,
            mut outbound_rx,
            outbound_tx,
            config,
            metrics,
        } = self;
        let session_id = session.id();

        log::info!(
            "WebSocket session {} established for {}",
            session_id,
            session.identity()
        );
        metrics.connection_established();

        let (mut ws_sender, mut ws_receiver) = socket.split();

        // Writer: drains the frame buffer onto the socket
        let send_task = tokio::spawn(async move {
            while let Some(msg) = outbound_rx.recv().await {
                let closing = matches!(msg, Message::Close(_));
                if ws_sender.send(msg).await.is_err() || closing {
                    break;
                }
            }
        });

        let heartbeat_period = Duration::from_secs(config.heartbeat_interval_secs);
        let heartbeat_timeout = Duration::from_secs(config.heartbeat_timeout_secs);
        let mut heartbeat = interval_at(Instant::now() + heartbeat_period, heartbeat_period);
        let mut last_seen = Instant::now();

        let result = loop {
            tokio::select! {
                msg = ws_receiver.next() => {
                    match msg {
                        Some(Ok(msg)) => {
                            last_seen = Instant::now();
                            match msg {
                                Message::Close(_) => {
                                    log::info!("Received close frame from session {session_id}");
                                    break Ok(());
                                }
                                Message::Ping(data) => {
                                    // Best effort
                                    let _ = outbound_tx.try_send(Message::Pong(data));
                                }
                                Message::Pong(_) => {}
                                Message::Text(text) => {
                                    log::debug!(
                                        "Ignoring text frame ({} bytes) from session {session_id}",
                                        text.as_str().len()
                                    );
                                }
                                Message::Binary(data) => {
                                    log::debug!(
                                        "Ignoring binary frame ({} bytes) from session {session_id}",
                                        data.len()
                                    );
                                }
                            }
                        }
                        Some(Err(e)) => {
                            log::error!("WebSocket error on session {session_id}: {e}");
                            break Err(WsError::from(e));
                        }
                        None => {
                            log::info!("Session {session_id} closed by client");
                            break Ok(());
                        }
                    }
                }

                _ = heartbeat.tick() => {
                    if last_seen.elapsed() > heartbeat_timeout {
                        log::warn!(
                            "Session {session_id} silent for over {}s, closing",
                            config.heartbeat_timeout_secs
                        );
                        break Err(WsError::HeartbeatTimeout {
                            timeout_secs: config.heartbeat_timeout_secs,
                            location: ErrorLocation::from(Location::caller()),
                        });
                    }
                    let _ = outbound_tx.try_send(Message::Ping(Bytes::new()));
                }

                _ = shutdown_guard.wait() => {
                    log::info!("Shutting down session {session_id} gracefully");
                    break Ok(());
                }
            }
        };

        // Stop broadcasts first, then flush a close frame
        session.close();
        let _ = outbound_tx.try_send(Message::Close(None));
        drop(outbound_tx);

        let abort = send_task.abort_handle();
        if timeout(CLOSE_FLUSH_TIMEOUT, send_task).await.is_err() {
            abort.abort();
        }

        metrics.connection_closed(match &result {
            Ok(()) => "normal",
            Err(e) => e.error_code(),
        });

        let connected_for = chrono::Utc::now() - session.info().connected_at;
        log::info!(
            "WebSocket session {session_id} closed after {}s",
            connected_for.num_seconds()
        );

        result
    }
}
