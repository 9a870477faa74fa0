use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WsError {
    #[error("Session {session_id} is closed {location}")]
    SessionClosed {
        session_id: String,
        location: ErrorLocation,
    },

    #[error("Send buffer full for session {session_id}, client too slow {location}")]
    SendBufferFull {
        session_id: String,
        location: ErrorLocation,
    },

    #[error("Send to session {session_id} timed out after {timeout_ms}ms {location}")]
    SendTimeout {
        session_id: String,
        timeout_ms: u64,
        location: ErrorLocation,
    },

    #[error("Transport error: {message} {location}")]
    Transport {
        message: String,
        location: ErrorLocation,
    },

    #[error("Connection limit exceeded: {current} sessions (max: {max}) {location}")]
    ConnectionLimitExceeded {
        current: usize,
        max: usize,
        location: ErrorLocation,
    },

    #[error("Session {session_id} is already registered {location}")]
    DuplicateSession {
        session_id: String,
        location: ErrorLocation,
    },

    #[error("Message queue closed, no producers left {location}")]
    QueueClosed { location: ErrorLocation },

    #[error("Message queue full {location}")]
    QueueFull { location: ErrorLocation },

    #[error("Heartbeat timeout after {timeout_secs}s {location}")]
    HeartbeatTimeout {
        timeout_secs: u64,
        location: ErrorLocation,
    },

    #[error("Unauthorized: {message} {location}")]
    Unauthorized {
        message: String,
        location: ErrorLocation,
    },

    #[error("Internal error: {message} {location}")]
    Internal {
        message: String,
        location: ErrorLocation,
    },
}

impl WsError {
    #[track_caller]
    pub fn session_closed(session_id: impl ToString) -> Self {
        Self::SessionClosed {
            session_id: session_id.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn send_buffer_full(session_id: impl ToString) -> Self {
        Self::SendBufferFull {
            session_id: session_id.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn queue_closed() -> Self {
        Self::QueueClosed {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn queue_full() -> Self {
        Self::QueueFull {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Stable classification used in log lines and metric labels
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SessionClosed { .. } => "SESSION_CLOSED",
            Self::SendBufferFull { .. } => "SLOW_CLIENT",
            Self::SendTimeout { .. } => "SEND_TIMEOUT",
            Self::Transport { .. } => "TRANSPORT_ERROR",
            Self::ConnectionLimitExceeded { .. } => "CONNECTION_LIMIT",
            Self::DuplicateSession { .. } => "DUPLICATE_SESSION",
            Self::QueueClosed { .. } => "QUEUE_CLOSED",
            Self::QueueFull { .. } => "QUEUE_FULL",
            Self::HeartbeatTimeout { .. } => "HEARTBEAT_TIMEOUT",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<axum::Error> for WsError {
    #[track_caller]
    fn from(source: axum::Error) -> Self {
        Self::Transport {
            message: source.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, WsError>;
