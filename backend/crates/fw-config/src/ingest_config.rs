use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_HOST, DEFAULT_INGEST_ENABLED, DEFAULT_INGEST_PORT,
    DEFAULT_MAX_LINE_LENGTH, MAX_MAX_LINE_LENGTH, MIN_MAX_LINE_LENGTH, MIN_PORT,
};

use serde::Deserialize;

/// Line-oriented TCP listener that feeds the message queue.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    /// Longest accepted line in bytes, excluding the terminator
    pub max_line_length: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            enabled: DEFAULT_INGEST_ENABLED,
            host: String::from(DEFAULT_HOST),
            port: DEFAULT_INGEST_PORT,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

impl IngestConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if !self.enabled {
            return Ok(());
        }

        if self.port != 0 && self.port < MIN_PORT {
            return Err(ConfigError::ingest(format!(
                "ingest.port must be 0 (auto) or >= {}, got {}",
                MIN_PORT, self.port
            )));
        }

        if self.max_line_length < MIN_MAX_LINE_LENGTH || self.max_line_length > MAX_MAX_LINE_LENGTH
        {
            return Err(ConfigError::ingest(format!(
                "ingest.max_line_length must be {}-{}, got {}",
                MIN_MAX_LINE_LENGTH, MAX_MAX_LINE_LENGTH, self.max_line_length
            )));
        }

        Ok(())
    }

    /// Get bind address as string.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
