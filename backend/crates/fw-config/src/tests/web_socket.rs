use crate::tests::{EnvGuard, setup_config_dir};
use crate::{Config, WebSocketConfig};

use googletest::assert_that;
use googletest::prelude::{anything, contains_substring, eq, err, ok};
use serial_test::serial;

// =========================================================================
// Validation Tests - WebSocket
// =========================================================================

#[test]
#[serial]
fn given_timeout_less_than_interval_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let _interval = EnvGuard::set("FW_WS_HEARTBEAT_INTERVAL_SECS", "60");
    let _timeout = EnvGuard::set("FW_WS_HEARTBEAT_TIMEOUT_SECS", "30");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_zero_send_buffer_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let _buffer = EnvGuard::set("FW_WS_SEND_BUFFER_SIZE", "0");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_boundary_heartbeat_values_when_validate_then_ok() {
    // Given
    let _temp = setup_config_dir();
    let _interval = EnvGuard::set("FW_WS_HEARTBEAT_INTERVAL_SECS", "5");
    let _timeout = EnvGuard::set("FW_WS_HEARTBEAT_TIMEOUT_SECS", "10");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, ok(anything()));
}

#[test]
#[serial]
fn given_timeout_below_two_pings_when_validate_then_error_names_minimum() {
    // Given - a single lost pong would already drop the dashboard
    let _temp = setup_config_dir();
    let _interval = EnvGuard::set("FW_WS_HEARTBEAT_INTERVAL_SECS", "30");
    let _timeout = EnvGuard::set("FW_WS_HEARTBEAT_TIMEOUT_SECS", "45");

    // When
    let config = Config::load().unwrap();
    let err_msg = config.validate().unwrap_err().to_string();

    // Then
    assert_that!(err_msg, contains_substring("heartbeat_timeout_secs"));
    assert_that!(err_msg, contains_substring("60-600"));
}

#[test]
#[serial]
fn given_interval_above_maximum_when_validate_then_error_names_field() {
    // Given
    let _temp = setup_config_dir();
    let _interval = EnvGuard::set("FW_WS_HEARTBEAT_INTERVAL_SECS", "301");
    let _timeout = EnvGuard::set("FW_WS_HEARTBEAT_TIMEOUT_SECS", "600");

    // When
    let config = Config::load().unwrap();
    let err_msg = config.validate().unwrap_err().to_string();

    // Then
    assert_that!(err_msg, contains_substring("websocket.heartbeat_interval_secs must be 5-300"));
}

#[test]
fn given_heartbeat_settings_when_missed_pings_then_counts_pings_beyond_the_first() {
    let defaults = WebSocketConfig::default();
    let lenient = WebSocketConfig {
        heartbeat_interval_secs: 10,
        heartbeat_timeout_secs: 45,
        ..WebSocketConfig::default()
    };

    assert_that!(defaults.missed_pings_tolerated(), eq(1));
    assert_that!(lenient.missed_pings_tolerated(), eq(3));
}
