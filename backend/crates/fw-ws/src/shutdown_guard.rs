use crate::ShutdownCoordinator;

use tokio::sync::watch;

/// Helper for gracefully handling shutdown in async tasks
pub struct ShutdownGuard {
    shutdown_rx: watch::Receiver<bool>,
}

impl ShutdownGuard {
    pub fn new(coordinator: &ShutdownCoordinator) -> Self {
        Self {
            shutdown_rx: coordinator.subscribe(),
        }
    }

    /// Wait for shutdown signal. Cancel safe.
    ///
    /// Pends forever once every coordinator is dropped without signalling,
    /// since nothing can request shutdown any more.
    pub async fn wait(&mut self) {
        if self.shutdown_rx.wait_for(|stopped| *stopped).await.is_err() {
            std::future::pending::<()>().await;
        }
    }

    /// Check for shutdown signal (non-blocking)
    pub fn is_shutdown(&self) -> bool {
        *self.shutdown_rx.borrow()
    }
}
