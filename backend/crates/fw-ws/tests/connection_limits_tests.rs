mod common;

use common::test_client::WsTestClient;
use common::test_server::{TestServerConfig, create_test_server_with_config};

use fw_ws::IDENTITY_HEADER;

use tokio::time::{Duration, sleep};

#[tokio::test]
async fn given_server_at_limit_when_new_connection_then_rejected_503() {
    // Given - single-session deployment with one operator connected
    let test_server = create_test_server_with_config(TestServerConfig::with_strict_limits());
    let _first = WsTestClient::connect(&test_server.server, "operator-1").await;

    // When
    let response = test_server
        .server
        .get_websocket("/ws")
        .add_header(IDENTITY_HEADER, "operator-2")
        .await;

    // Then
    response.assert_status_service_unavailable();
    assert_eq!(test_server.app_state.registry.total_count().await, 1);
}

#[tokio::test]
async fn given_session_left_when_new_connection_then_slot_reused() {
    // Given
    let test_server = create_test_server_with_config(TestServerConfig::with_strict_limits());
    let first = WsTestClient::connect(&test_server.server, "operator-1").await;
    first.close().await;

    for _ in 0..50 {
        if test_server.app_state.registry.total_count().await == 0 {
            break;
        }
        sleep(Duration::from_millis(20)).await;
    }

    // When
    let mut second = WsTestClient::connect(&test_server.server, "operator-2").await;
    test_server.sender.send("alert: failover").await.unwrap();

    // Then
    assert_eq!(second.receive_text().await, "alert: failover");
    second.close().await;
}
