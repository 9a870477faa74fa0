/// Configuration for session limits
#[derive(Debug, Clone)]
pub struct SessionLimits {
    /// Maximum sessions registered at once
    pub max_total: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self { max_total: 1000 }
    }
}
