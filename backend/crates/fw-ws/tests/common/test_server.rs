#![allow(dead_code)]

use fw_ws::{
    AppState, BroadcastConfig, Broadcaster, BroadcasterHandle, ConnectionConfig, MessageSender,
    Metrics, SessionLimits, SessionRegistry, ShutdownCoordinator, message_queue,
};

use axum::{Router, routing::get};
use axum_test::TestServer;

/// Identity asserted for test clients unless a test picks its own
pub const TEST_IDENTITY: &str = "ops-dashboard";

/// Configuration for test server instances
#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub require_identity: bool,
    pub max_connections_total: usize,
    pub queue_capacity: usize,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            require_identity: true,
            max_connections_total: 100,
            queue_capacity: 64,
        }
    }
}

impl TestServerConfig {
    /// Accept clients that assert no identity
    pub fn with_optional_identity() -> Self {
        Self {
            require_identity: false,
            ..Default::default()
        }
    }

    /// Single-session limit, as in a single-operator deployment
    pub fn with_strict_limits() -> Self {
        Self {
            max_connections_total: 1,
            ..Default::default()
        }
    }
}

/// Test server wired to a running broadcaster
pub struct TestServerWithState {
    pub server: TestServer,
    pub app_state: AppState,
    pub sender: MessageSender,
    pub broadcaster: BroadcasterHandle,
}

/// Create a TestServer with default configuration
pub fn create_test_server() -> TestServerWithState {
    create_test_server_with_config(TestServerConfig::default())
}

/// Create a TestServer with custom configuration
pub fn create_test_server_with_config(config: TestServerConfig) -> TestServerWithState {
    let app_state = AppState {
        registry: SessionRegistry::new(SessionLimits {
            max_total: config.max_connections_total,
        }),
        metrics: Metrics::default(),
        shutdown: ShutdownCoordinator::new(),
        config: ConnectionConfig::default(),
        require_identity: config.require_identity,
    };

    let (sender, queue) = message_queue(config.queue_capacity);
    let broadcaster = Broadcaster::new(
        app_state.registry.clone(),
        queue,
        BroadcastConfig::default(),
        app_state.metrics.clone(),
    )
    .start();

    let router = Router::new()
        .route("/ws", get(fw_ws::handler))
        .with_state(app_state.clone());

    let server = TestServer::builder()
        .http_transport()
        .build(router)
        .expect("Failed to create test server");

    TestServerWithState {
        server,
        app_state,
        sender,
        broadcaster,
    }
}
