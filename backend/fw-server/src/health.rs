use crate::ServerState;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// GET /health - component status
pub async fn health(State(state): State<ServerState>) -> Response {
    let sessions = state.app.registry.total_count().await;
    let broadcaster_running = state.broadcaster.is_running();
    let shutting_down = state.app.shutdown.is_shutdown();

    let status = if broadcaster_running && !shutting_down {
        "healthy"
    } else {
        "degraded"
    };

    let health = json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
        "components": {
            "broadcaster": if broadcaster_running { "running" } else { "stopped" },
            "websocket": if shutting_down { "draining" } else { "operational" },
        },
        "sessions": sessions,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (StatusCode::OK, Json(health)).into_response()
}

/// GET /live - liveness probe (is the process alive?)
pub async fn liveness() -> Response {
    (StatusCode::OK, "OK").into_response()
}

/// GET /ready - readiness probe. Not ready once shutdown has begun or the
/// broadcaster has stopped.
pub async fn readiness(State(state): State<ServerState>) -> Response {
    if state.app.shutdown.is_shutdown() || !state.broadcaster.is_running() {
        return (StatusCode::SERVICE_UNAVAILABLE, "Not Ready").into_response();
    }

    (StatusCode::OK, "Ready").into_response()
}
