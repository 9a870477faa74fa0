
use crate::ServerState;

use fw_ws::{
    AppState, BroadcastConfig, Broadcaster, BroadcasterHandle, ConnectionConfig, MessageSender,
    Metrics, SessionLimits, SessionRegistry, ShutdownCoordinator, message_queue,
};

use metrics_exporter_prometheus::PrometheusBuilder;

/// Server state with a live broadcaster and a recorder that is not installed
/// globally
pub(crate) fn create_test_state() -> (ServerState, MessageSender, BroadcasterHandle) {
    let registry = SessionRegistry::new(SessionLimits { max_total: 10 });
    let metrics = Metrics::new();
    let (sender, queue) = message_queue(16);
    let broadcaster = Broadcaster::new(
        registry.clone(),
        queue,
        BroadcastConfig::default(),
        metrics.clone(),
    )
    .start();

    let state = ServerState {
        app: AppState {
            registry,
            metrics,
            shutdown: ShutdownCoordinator::new(),
            config: ConnectionConfig::default(),
            require_identity: true,
        },
        broadcaster: broadcaster.status(),
        prometheus: PrometheusBuilder::new().build_recorder().handle(),
    };

    (state, sender, broadcaster)
}
