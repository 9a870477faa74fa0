//! The broadcaster worker.
//!
//! One task takes messages off the [`MessageQueue`] one at a time and sends
//! each to every open session in a fresh registry snapshot. A failing or
//! panicking session is logged and skipped; nothing short of cancellation or
//! the loss of every producer ends the loop. Shutdown also interrupts a send
//! that is still in flight.

use crate::{
    BroadcastConfig, BroadcastMessage, MessageQueue, Metrics, MetricsTimer,
    Result as WsErrorResult, Session, SessionView, ShutdownCoordinator, ShutdownGuard, Take,
    WsError,
};

use std::fmt;
use std::panic::{AssertUnwindSafe, Location};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use error_location::ErrorLocation;
use futures::FutureExt;
use log::{debug, error, info, warn};
use tokio::task::JoinHandle;

/// Why the broadcaster stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// Stopped by request
    Cancelled,
    /// Every producer dropped its sender and the queue drained
    SourceClosed,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => f.write_str("cancelled"),
            Self::SourceClosed => f.write_str("source closed"),
        }
    }
}

/// Per-message delivery counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Shutdown arrived mid-cycle; the remaining sessions were not sent to
    pub cancelled: bool,
}

/// Fans queued messages out to the sessions of a [`SessionView`].
pub struct Broadcaster<V> {
    fanout: Fanout<V>,
    queue: MessageQueue,
}

struct Fanout<V> {
    sessions: V,
    config: BroadcastConfig,
    metrics: Metrics,
}

impl<V: SessionView + 'static> Broadcaster<V> {
    pub fn new(sessions: V, queue: MessageQueue, config: BroadcastConfig, metrics: Metrics) -> Self {
        Self {
            fanout: Fanout {
                sessions,
                config,
                metrics,
            },
            queue,
        }
    }

    /// Spawn the loop on its own task, cancelled only through the handle.
    pub fn start(self) -> BroadcasterHandle {
        self.start_with(ShutdownCoordinator::new())
    }

    /// Spawn the loop on its own task, stopping when `shutdown` fires.
    ///
    /// With a coordinator shared by the event sources, a shutdown that also
    /// closes the queue still ends the loop with `Cancelled`.
    pub fn start_with(self, shutdown: ShutdownCoordinator) -> BroadcasterHandle {
        let guard = shutdown.subscribe_guard();
        let running = Arc::new(AtomicBool::new(true));

        let running_flag = Arc::clone(&running);
        let task = tokio::spawn(async move {
            let reason = self.run(guard).await;
            running_flag.store(false, Ordering::Release);
            reason
        });

        BroadcasterHandle {
            shutdown,
            task,
            status: BroadcasterStatus { running },
        }
    }

    /// Run the loop on the current task until `shutdown` fires or the
    /// queue closes.
    pub async fn run(self, mut shutdown: ShutdownGuard) -> ExitReason {
        let Self { fanout, mut queue } = self;
        info!("Broadcaster started");

        let reason = loop {
            let message = match queue.take(&mut shutdown).await {
                Ok(Take::Message(message)) => message,
                Ok(Take::Cancelled) => {
                    info!("Broadcaster cancelled while waiting for the next message");
                    break ExitReason::Cancelled;
                }
                Err(WsError::QueueClosed { .. }) => {
                    warn!("Message queue closed, no event source left to broadcast from");
                    break ExitReason::SourceClosed;
                }
                Err(e) => {
                    error!("Failed to take message from queue: {e}");
                    fanout.metrics.error_occurred(e.error_code());
                    continue;
                }
            };

            fanout.metrics.message_taken();
            let report = fanout.broadcast(&message, &mut shutdown).await;
            if report.cancelled {
                info!("Broadcaster cancelled during a broadcast");
                break ExitReason::Cancelled;
            }
        };

        info!("Broadcaster stopped: {reason}");
        reason
    }
}

/// How one session's turn in a broadcast ended
enum Delivery {
    Sent,
    Skipped,
    Failed(WsError),
    /// Shutdown fired while the send was in flight
    Interrupted,
}

impl<V: SessionView> Fanout<V> {
    async fn broadcast(
        &self,
        message: &BroadcastMessage,
        shutdown: &mut ShutdownGuard,
    ) -> BroadcastReport {
        let timer = MetricsTimer::new(self.metrics.clone());

        if !message.is_heartbeat(&self.config.heartbeat_prefix) {
            info!("Sending message to active sessions: {message}");
        }

        let sessions = self.sessions.snapshot().await;
        let mut report = BroadcastReport::default();

        for session in &sessions {
            if shutdown.is_shutdown() {
                report.cancelled = true;
                break;
            }

            match self.deliver(session.as_ref(), message, shutdown).await {
                Delivery::Sent => {
                    report.delivered += 1;
                    self.metrics.message_sent();
                }
                Delivery::Skipped => {
                    report.skipped += 1;
                    self.metrics.session_skipped();
                }
                Delivery::Failed(e) => {
                    report.failed += 1;
                    warn!(
                        "Failed to send message to session {} ({}): [{}] {}",
                        session.id(),
                        session.identity(),
                        e.error_code(),
                        e
                    );
                    self.metrics.send_failed(e.error_code());
                }
                Delivery::Interrupted => {
                    debug!(
                        "Shutdown interrupted send to session {} ({})",
                        session.id(),
                        session.identity()
                    );
                    report.cancelled = true;
                    break;
                }
            }
        }

        debug!(
            "Broadcast finished: {} delivered, {} skipped, {} failed of {} sessions",
            report.delivered,
            report.skipped,
            report.failed,
            sessions.len()
        );

        self.metrics.broadcast_published(report.delivered);
        timer.finish();
        report
    }

    /// One session's turn: the open check and the send. A panic in either
    /// counts as a failure for this session only.
    async fn deliver(
        &self,
        session: &dyn Session,
        message: &BroadcastMessage,
        shutdown: &mut ShutdownGuard,
    ) -> Delivery {
        match std::panic::catch_unwind(AssertUnwindSafe(|| session.is_open())) {
            Ok(true) => {}
            Ok(false) => return Delivery::Skipped,
            Err(_) => return Delivery::Failed(WsError::internal("session open check panicked")),
        }

        tokio::select! {
            biased;

            _ = shutdown.wait() => Delivery::Interrupted,

            outcome = self.send_to(session, message) => match outcome {
                Ok(()) => Delivery::Sent,
                Err(e) => Delivery::Failed(e),
            },
        }
    }

    /// One send, bounded by the configured timeout. A panicking session
    /// counts as a failed send.
    async fn send_to(&self, session: &dyn Session, message: &BroadcastMessage) -> WsErrorResult<()> {
        let send = AssertUnwindSafe(session.send(message)).catch_unwind();

        let outcome = match self.config.send_timeout {
            Some(limit) => match tokio::time::timeout(limit, send).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    return Err(WsError::SendTimeout {
                        session_id: session.id().to_string(),
                        timeout_ms: limit.as_millis() as u64,
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
            },
            None => send.await,
        };

        outcome.unwrap_or_else(|_| Err(WsError::internal("session send panicked")))
    }
}

/// Cheap, cloneable view of whether the worker is still running
#[derive(Debug, Clone)]
pub struct BroadcasterStatus {
    running: Arc<AtomicBool>,
}

impl BroadcasterStatus {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Handle to a started broadcaster.
///
/// Dropping the handle detaches the worker; it then runs until its queue
/// closes.
pub struct BroadcasterHandle {
    shutdown: ShutdownCoordinator,
    task: JoinHandle<ExitReason>,
    status: BroadcasterStatus,
}

impl BroadcasterHandle {
    /// Request the loop stop. Wakes a pending take immediately.
    pub fn cancel(&self) {
        self.shutdown.shutdown();
    }

    /// Whether `cancel` has been called
    pub fn is_cancelled(&self) -> bool {
        self.shutdown.is_shutdown()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn status(&self) -> BroadcasterStatus {
        self.status.clone()
    }

    /// Wait for the worker to exit
    pub async fn join(self) -> WsErrorResult<ExitReason> {
        self.task
            .await
            .map_err(|e| WsError::internal(format!("Broadcaster task failed: {e}")))
    }

    /// Cancel, then wait for the worker to exit
    pub async fn stop(self) -> WsErrorResult<ExitReason> {
        self.cancel();
        self.join().await
    }
}
