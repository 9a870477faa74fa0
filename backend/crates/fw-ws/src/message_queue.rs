use crate::{BroadcastMessage, Result as WsErrorResult, ShutdownGuard, WsError};

use std::future::Future;

use tokio::sync::mpsc;

/// Outcome of a successful take
#[derive(Debug, PartialEq, Eq)]
pub enum Take {
    Message(BroadcastMessage),
    /// Shutdown was requested while waiting
    Cancelled,
}

/// Create a bounded FIFO queue between an event source and the broadcaster.
pub fn message_queue(capacity: usize) -> (MessageSender, MessageQueue) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (MessageSender { tx }, MessageQueue { rx })
}

/// Producer side. Cheap to clone, one per event source.
#[derive(Clone)]
pub struct MessageSender {
    tx: mpsc::Sender<BroadcastMessage>,
}

impl MessageSender {
    /// Enqueue a message, waiting for capacity.
    ///
    /// A `QueueClosed` error carries the location of the call, not of the
    /// await.
    #[track_caller]
    pub fn send(
        &self,
        message: impl Into<BroadcastMessage>,
    ) -> impl Future<Output = WsErrorResult<()>> {
        let closed = WsError::queue_closed();
        let message = message.into();
        async move { self.tx.send(message).await.map_err(|_| closed) }
    }

    /// Enqueue a message without waiting
    #[track_caller]
    pub fn try_send(&self, message: impl Into<BroadcastMessage>) -> WsErrorResult<()> {
        match self.tx.try_send(message.into()) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => Err(WsError::queue_full()),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(WsError::queue_closed()),
        }
    }

    /// True once the consuming side is gone
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer side, owned by the broadcaster.
pub struct MessageQueue {
    rx: mpsc::Receiver<BroadcastMessage>,
}

impl MessageQueue {
    /// Wait for the next message.
    ///
    /// Returns `Take::Cancelled` as soon as shutdown is signalled, even while
    /// messages are still queued. Fails with `QueueClosed` once every sender
    /// is dropped and the buffer is drained.
    #[track_caller]
    pub fn take(
        &mut self,
        shutdown: &mut ShutdownGuard,
    ) -> impl Future<Output = WsErrorResult<Take>> {
        let closed = WsError::queue_closed();
        async move {
            tokio::select! {
                biased;

                _ = shutdown.wait() => Ok(Take::Cancelled),

                message = self.rx.recv() => match message {
                    Some(message) => Ok(Take::Message(message)),
                    None => Err(closed),
                },
            }
        }
    }
}
