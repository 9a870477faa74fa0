#![allow(dead_code)]

//! Test infrastructure for fw-server end-to-end tests

use fw_server::{IngestServer, ServerState, build_router};

use fw_config::IngestConfig;
use fw_ws::{
    AppState, BroadcastConfig, Broadcaster, BroadcasterHandle, ConnectionConfig, Metrics,
    SessionLimits, SessionRegistry, ShutdownCoordinator, message_queue,
};

use std::net::SocketAddr;

use axum_test::TestServer;
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::task::JoinHandle;

/// A full server: HTTP endpoints, broadcaster and TCP ingest
pub struct TestStack {
    pub server: TestServer,
    pub state: ServerState,
    pub shutdown: ShutdownCoordinator,
    pub ingest_addr: SocketAddr,
    pub ingest_task: JoinHandle<()>,
    pub broadcaster: BroadcasterHandle,
}

/// Wire the stack the way `main` does, without global logger or recorder
pub async fn create_test_stack(max_sessions: usize) -> TestStack {
    let registry = SessionRegistry::new(SessionLimits {
        max_total: max_sessions,
    });
    let metrics = Metrics::new();
    let shutdown = ShutdownCoordinator::new();

    let (sender, queue) = message_queue(64);
    let broadcaster = Broadcaster::new(
        registry.clone(),
        queue,
        BroadcastConfig::default(),
        metrics.clone(),
    )
    .start_with(shutdown.clone());

    let ingest_config = IngestConfig {
        enabled: true,
        host: String::from("127.0.0.1"),
        port: 0,
        max_line_length: 1024,
    };
    let ingest = IngestServer::bind(&ingest_config, sender)
        .await
        .expect("Failed to bind ingest");
    let ingest_addr = ingest.local_addr().expect("ingest address");
    let ingest_task = tokio::spawn(ingest.run(shutdown.clone()));

    let state = ServerState {
        app: AppState {
            registry,
            metrics,
            shutdown: shutdown.clone(),
            config: ConnectionConfig::default(),
            require_identity: true,
        },
        broadcaster: broadcaster.status(),
        prometheus: PrometheusBuilder::new().build_recorder().handle(),
    };

    let server = TestServer::builder()
        .http_transport()
        .build(build_router(state.clone()))
        .expect("Failed to create test server");

    TestStack {
        server,
        state,
        shutdown,
        ingest_addr,
        ingest_task,
        broadcaster,
    }
}
