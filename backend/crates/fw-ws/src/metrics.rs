use metrics::{counter, gauge, histogram};

/// Metrics collector for the broadcaster and its sessions
#[derive(Clone)]
pub struct Metrics {
    prefix: &'static str,
}

impl Metrics {
    pub fn new() -> Self {
        Self { prefix: "fw_ws" }
    }

    /// Record new session established
    pub fn connection_established(&self) {
        counter!(format!("{}.connections.established", self.prefix)).increment(1);
        gauge!(format!("{}.connections.active", self.prefix)).increment(1.0);
    }

    /// Record session closed
    pub fn connection_closed(&self, reason: &str) {
        counter!(format!("{}.connections.closed", self.prefix)).increment(1);
        counter!(format!("{}.connections.closed.{}", self.prefix, reason)).increment(1);
        gauge!(format!("{}.connections.active", self.prefix)).decrement(1.0);
    }

    /// Record message taken off the queue
    pub fn message_taken(&self) {
        counter!(format!("{}.queue.taken", self.prefix)).increment(1);
    }

    /// Record message delivered to one session
    pub fn message_sent(&self) {
        counter!(format!("{}.messages.sent", self.prefix)).increment(1);
    }

    /// Record a closed session skipped during a broadcast
    pub fn session_skipped(&self) {
        counter!(format!("{}.sessions.skipped", self.prefix)).increment(1);
    }

    /// Record a failed send, labelled by error code
    pub fn send_failed(&self, error_code: &str) {
        counter!(format!("{}.messages.failed", self.prefix)).increment(1);
        counter!(format!("{}.messages.failed.{}", self.prefix, error_code)).increment(1);
    }

    /// Record one completed broadcast cycle
    pub fn broadcast_published(&self, recipient_count: usize) {
        counter!(format!("{}.broadcast.published", self.prefix)).increment(1);
        gauge!(format!("{}.broadcast.recipients", self.prefix)).set(recipient_count as f64);
    }

    /// Record error occurrence
    pub fn error_occurred(&self, error_type: &str) {
        counter!(format!("{}.errors.total", self.prefix)).increment(1);
        counter!(format!("{}.errors.{}", self.prefix, error_type)).increment(1);
    }

    /// Record broadcast cycle latency
    pub fn broadcast_latency(&self, duration: std::time::Duration) {
        histogram!(format!("{}.broadcast.latency_ms", self.prefix))
            .record(duration.as_millis() as f64);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
