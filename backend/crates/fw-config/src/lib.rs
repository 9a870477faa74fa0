mod broadcast_config;
mod config;
mod error;
mod ingest_config;
mod log_level;
mod logging_config;
mod server_config;
mod websocket_config;

#[cfg(test)]
mod tests;

pub use broadcast_config::BroadcastConfig;
pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use ingest_config::IngestConfig;
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use server_config::ServerConfig;
pub use websocket_config::WebSocketConfig;

const CONFIG_DIR_ENV: &str = "FW_CONFIG_DIR";
const CONFIG_DIR_NAME: &str = ".fw";
const CONFIG_FILE_NAME: &str = "config.toml";

// Server
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const MIN_PORT: u16 = 1024;
const DEFAULT_MAX_CONNECTIONS: usize = 1000;
const MIN_MAX_CONNECTIONS: usize = 1;
const MAX_MAX_CONNECTIONS: usize = 100_000;
const DEFAULT_REQUIRE_IDENTITY: bool = true;

// Logging
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";
const DEFAULT_LOG_COLORED: bool = true;

// WebSocket
const DEFAULT_SEND_BUFFER_SIZE: usize = 100;
const MIN_SEND_BUFFER_SIZE: usize = 1;
const MAX_SEND_BUFFER_SIZE: usize = 10_000;
const DEFAULT_HEARTBEAT_INTERVAL_SECS: u64 = 30;
const MIN_HEARTBEAT_INTERVAL_SECS: u64 = 5;
const MAX_HEARTBEAT_INTERVAL_SECS: u64 = 300;
const DEFAULT_HEARTBEAT_TIMEOUT_SECS: u64 = 60;
const MAX_HEARTBEAT_TIMEOUT_SECS: u64 = 600;
const MIN_PINGS_PER_TIMEOUT: u64 = 2;

// Broadcast
const DEFAULT_QUEUE_CAPACITY: usize = 1024;
const MIN_QUEUE_CAPACITY: usize = 1;
const MAX_QUEUE_CAPACITY: usize = 1_000_000;
const DEFAULT_HEARTBEAT_PREFIX: &str = "{node_metrics";
const DEFAULT_SEND_TIMEOUT_MS: u64 = 0;
const MAX_SEND_TIMEOUT_MS: u64 = 60_000;

// Ingest
const DEFAULT_INGEST_ENABLED: bool = true;
const DEFAULT_INGEST_PORT: u16 = 9000;
const DEFAULT_MAX_LINE_LENGTH: usize = 64 * 1024;
const MIN_MAX_LINE_LENGTH: usize = 64;
const MAX_MAX_LINE_LENGTH: usize = 16 * 1024 * 1024;
