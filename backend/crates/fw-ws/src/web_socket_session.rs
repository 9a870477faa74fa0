use crate::{BroadcastMessage, Result as WsErrorResult, Session, SessionId, SessionInfo, WsError};

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use axum::extract::ws::Message;
use tokio::sync::mpsc;

/// [`Session`] backed by the outgoing frame buffer of one WebSocket.
///
/// Sends never wait: a full buffer means the client is too slow and the
/// frame is refused, so one stalled dashboard cannot hold up the broadcaster.
pub struct WebSocketSession {
    info: SessionInfo,
    sender: mpsc::Sender<Message>,
    open: AtomicBool,
}

impl WebSocketSession {
    pub fn new(info: SessionInfo, sender: mpsc::Sender<Message>) -> Self {
        Self {
            info,
            sender,
            open: AtomicBool::new(true),
        }
    }

    pub fn info(&self) -> &SessionInfo {
        &self.info
    }

    /// Mark the session closed. Later sends fail with `SessionClosed`.
    pub fn close(&self) {
        self.open.store(false, Ordering::Release);
    }
}

#[async_trait]
impl Session for WebSocketSession {
    fn id(&self) -> SessionId {
        self.info.session_id
    }

    fn identity(&self) -> &str {
        &self.info.identity
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire) && !self.sender.is_closed()
    }

    async fn send(&self, message: &BroadcastMessage) -> WsErrorResult<()> {
        if !self.open.load(Ordering::Acquire) {
            return Err(WsError::session_closed(self.info.session_id));
        }

        self.sender
            .try_send(Message::Text(message.as_str().into()))
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => {
                    WsError::send_buffer_full(self.info.session_id)
                }
                mpsc::error::TrySendError::Closed(_) => {
                    WsError::session_closed(self.info.session_id)
                }
            })
    }
}
