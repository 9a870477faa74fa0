use fw_ws::{AppState, BroadcasterStatus};

use axum::extract::FromRef;
use metrics_exporter_prometheus::PrometheusHandle;

/// Router state: the WebSocket state plus what the operational endpoints
/// need to report on.
#[derive(Clone)]
pub struct ServerState {
    pub app: AppState,
    pub broadcaster: BroadcasterStatus,
    pub prometheus: PrometheusHandle,
}

impl FromRef<ServerState> for AppState {
    fn from_ref(state: &ServerState) -> Self {
        state.app.clone()
    }
}
