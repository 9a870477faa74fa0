#![allow(dead_code)]

use fw_ws::IDENTITY_HEADER;

use axum_test::{TestServer, TestWebSocket};
use tokio::time::{Duration, timeout};

/// How long a client waits for a broadcast before the test fails
const RECEIVE_TIMEOUT: Duration = Duration::from_secs(2);

/// WebSocket test client wrapper
pub struct WsTestClient {
    ws: TestWebSocket,
    pub identity: String,
}

impl WsTestClient {
    /// Connect to the WebSocket endpoint asserting `identity`
    pub async fn connect(server: &TestServer, identity: &str) -> Self {
        let ws = server
            .get_websocket("/ws")
            .add_header(IDENTITY_HEADER, identity)
            .await
            .into_websocket()
            .await;

        Self {
            ws,
            identity: identity.to_string(),
        }
    }

    /// Connect without asserting an identity
    pub async fn connect_anonymous(server: &TestServer) -> Self {
        let ws = server.get_websocket("/ws").await.into_websocket().await;

        Self {
            ws,
            identity: String::from(fw_ws::ANONYMOUS_IDENTITY),
        }
    }

    /// Receive the next broadcast as text
    pub async fn receive_text(&mut self) -> String {
        timeout(RECEIVE_TIMEOUT, self.ws.receive_text())
            .await
            .expect("timed out waiting for a broadcast")
    }

    /// Send text; the server ignores client frames
    pub async fn send_text(&mut self, text: impl std::fmt::Display) {
        self.ws.send_text(text).await;
    }

    /// Close the WebSocket connection
    pub async fn close(self) {
        self.ws.close().await;
    }
}

/// Connect `count` clients named `{prefix}-1..`
pub async fn connect_clients(server: &TestServer, prefix: &str, count: usize) -> Vec<WsTestClient> {
    let mut clients = Vec::with_capacity(count);
    for i in 0..count {
        let identity = format!("{}-{}", prefix, i + 1);
        clients.push(WsTestClient::connect(server, &identity).await);
    }
    clients
}
