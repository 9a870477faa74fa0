use crate::{
    BroadcastConfig, CONFIG_DIR_ENV, CONFIG_DIR_NAME, CONFIG_FILE_NAME, ConfigError,
    ConfigErrorResult, IngestConfig, LoggingConfig, ServerConfig, WebSocketConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub websocket: WebSocketConfig,
    pub broadcast: BroadcastConfig,
    pub ingest: IngestConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. Check for FW_CONFIG_DIR env var, else use ./.fw/
    /// 2. Auto-create config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply FW_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILE_NAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load and parse TOML file with detailed error context.
    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: FW_CONFIG_DIR env var > ./.fw/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(CONFIG_DIR_NAME))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.server.validate()?;
        self.logging.validate()?;
        self.websocket.validate()?;
        self.broadcast.validate()?;
        self.ingest.validate()?;

        if self.ingest.enabled
            && self.ingest.port != 0
            && self.ingest.port == self.server.port
            && self.ingest.host == self.server.host
        {
            return Err(ConfigError::config(format!(
                "ingest and server cannot share {}",
                self.bind_addr()
            )));
        }

        Ok(())
    }

    /// Absolute path of the log file, when file logging is configured.
    pub fn log_file_path(&self) -> ConfigErrorResult<Option<PathBuf>> {
        match self.logging.file {
            Some(ref filename) => {
                let log_dir = Self::config_dir()?.join(&self.logging.dir);
                Ok(Some(log_dir.join(filename)))
            }
            None => Ok(None),
        }
    }

    /// Get bind address as string.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Log configuration summary.
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  server: {}:{} (max {} sessions, identity {})",
            self.server.host,
            self.server.port,
            self.server.max_connections,
            if self.server.require_identity {
                "required"
            } else {
                "optional"
            }
        );

        info!(
            "  logging: {} (colored: {}, file: {})",
            *self.logging.level,
            self.logging.colored,
            self.logging.file.as_deref().unwrap_or("stdout")
        );

        info!(
            "  websocket: buffer={}, heartbeat={}s/{}s ({} missed pings tolerated)",
            self.websocket.send_buffer_size,
            self.websocket.heartbeat_interval_secs,
            self.websocket.heartbeat_timeout_secs,
            self.websocket.missed_pings_tolerated()
        );

        info!(
            "  broadcast: queue={}, heartbeat_prefix={:?}, send_timeout={}",
            self.broadcast.queue_capacity,
            self.broadcast.heartbeat_prefix,
            match self.broadcast.send_timeout_ms {
                0 => String::from("none"),
                ms => format!("{ms}ms"),
            }
        );

        if self.ingest.enabled {
            info!(
                "  ingest: {} (max line {} bytes)",
                self.ingest.bind_addr(),
                self.ingest.max_line_length
            );
        } else {
            info!("  ingest: disabled");
        }
    }

    fn apply_env_overrides(&mut self) {
        // Server
        Self::apply_env_string("FW_SERVER_HOST", &mut self.server.host);
        Self::apply_env_parse("FW_SERVER_PORT", &mut self.server.port);
        Self::apply_env_parse(
            "FW_SERVER_MAX_CONNECTIONS",
            &mut self.server.max_connections,
        );
        Self::apply_env_bool(
            "FW_SERVER_REQUIRE_IDENTITY",
            &mut self.server.require_identity,
        );

        // Logging
        Self::apply_env_parse("FW_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("FW_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("FW_LOG_FILE", &mut self.logging.file);

        // WebSocket
        Self::apply_env_parse(
            "FW_WS_SEND_BUFFER_SIZE",
            &mut self.websocket.send_buffer_size,
        );
        Self::apply_env_parse(
            "FW_WS_HEARTBEAT_INTERVAL_SECS",
            &mut self.websocket.heartbeat_interval_secs,
        );
        Self::apply_env_parse(
            "FW_WS_HEARTBEAT_TIMEOUT_SECS",
            &mut self.websocket.heartbeat_timeout_secs,
        );

        // Broadcast
        Self::apply_env_parse(
            "FW_BROADCAST_QUEUE_CAPACITY",
            &mut self.broadcast.queue_capacity,
        );
        Self::apply_env_string(
            "FW_BROADCAST_HEARTBEAT_PREFIX",
            &mut self.broadcast.heartbeat_prefix,
        );
        Self::apply_env_parse(
            "FW_BROADCAST_SEND_TIMEOUT_MS",
            &mut self.broadcast.send_timeout_ms,
        );

        // Ingest
        Self::apply_env_bool("FW_INGEST_ENABLED", &mut self.ingest.enabled);
        Self::apply_env_string("FW_INGEST_HOST", &mut self.ingest.host);
        Self::apply_env_parse("FW_INGEST_PORT", &mut self.ingest.port);
        Self::apply_env_parse(
            "FW_INGEST_MAX_LINE_LENGTH",
            &mut self.ingest.max_line_length,
        );
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
