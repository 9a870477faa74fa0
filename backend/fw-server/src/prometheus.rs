//! Prometheus recorder and the `/metrics` endpoint.

use crate::{ServerError, ServerErrorResult, ServerState};

use axum::{
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use log::info;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the global Prometheus recorder. Call once, before any metric is
/// recorded.
#[track_caller]
pub fn install_recorder() -> ServerErrorResult<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ServerError::metrics(format!("Failed to install metrics recorder: {e}")))?;
    info!("Prometheus metrics recorder installed");
    Ok(handle)
}

/// GET /metrics - Prometheus text exposition
pub async fn metrics(State(state): State<ServerState>) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.prometheus.render(),
    )
        .into_response()
}
