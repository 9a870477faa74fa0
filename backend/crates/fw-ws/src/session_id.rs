use error_location::ErrorLocation;

use uuid::Uuid;

/// Unique session identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[track_caller]
    pub fn parse(value: &str) -> Result<Self, crate::WsError> {
        let uuid = Uuid::parse_str(value).map_err(|_| crate::WsError::Internal {
            message: format!("Invalid session_id: {}", value),
            location: ErrorLocation::from(std::panic::Location::caller()),
        })?;
        Ok(Self(uuid))
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
