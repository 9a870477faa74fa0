//! Runs in its own binary: it installs a process-wide logger.

use fw_ws::{
    BroadcastConfig, BroadcastMessage, Broadcaster, ExitReason, Metrics, Result as WsResult,
    Session, SessionId, SessionLimits, SessionRegistry, ShutdownCoordinator, message_queue,
};

use std::sync::{Arc, Mutex, OnceLock};

use async_trait::async_trait;
use log::{Level, LevelFilter, Log, Metadata, Record};

const ANNOUNCEMENT: &str = "Sending message to active sessions: ";

struct CapturingLogger {
    lines: Mutex<Vec<String>>,
}

impl Log for CapturingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Info
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.lines.lock().unwrap().push(record.args().to_string());
        }
    }

    fn flush(&self) {}
}

fn logger() -> &'static CapturingLogger {
    static LOGGER: OnceLock<CapturingLogger> = OnceLock::new();
    LOGGER.get_or_init(|| CapturingLogger {
        lines: Mutex::new(Vec::new()),
    })
}

struct RecordingSession {
    id: SessionId,
    received: Mutex<Vec<String>>,
}

#[async_trait]
impl Session for RecordingSession {
    fn id(&self) -> SessionId {
        self.id
    }

    fn identity(&self) -> &str {
        "recorder"
    }

    fn is_open(&self) -> bool {
        true
    }

    async fn send(&self, message: &BroadcastMessage) -> WsResult<()> {
        self.received.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

#[tokio::test]
async fn given_heartbeat_and_alert_when_broadcast_then_only_alert_announced_but_both_delivered() {
    // Given
    log::set_logger(logger()).unwrap();
    log::set_max_level(LevelFilter::Info);

    let registry = SessionRegistry::new(SessionLimits { max_total: 10 });
    let session = Arc::new(RecordingSession {
        id: SessionId::new(),
        received: Mutex::new(Vec::new()),
    });
    registry.register(session.clone()).await.unwrap();

    let (sender, queue) = message_queue(8);
    sender.send("{node_metrics: 1}").await.unwrap();
    sender.send("alert: cpu_high").await.unwrap();
    drop(sender);

    // When
    let reason = Broadcaster::new(registry, queue, BroadcastConfig::default(), Metrics::new())
        .run(ShutdownCoordinator::new().subscribe_guard())
        .await;

    // Then
    assert_eq!(reason, ExitReason::SourceClosed);
    assert_eq!(
        *session.received.lock().unwrap(),
        vec!["{node_metrics: 1}", "alert: cpu_high"]
    );

    let announcements: Vec<String> = logger()
        .lines
        .lock()
        .unwrap()
        .iter()
        .filter(|line| line.starts_with(ANNOUNCEMENT))
        .cloned()
        .collect();
    assert_eq!(
        announcements,
        vec![format!("{ANNOUNCEMENT}alert: cpu_high")]
    );
}
