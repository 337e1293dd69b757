use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Route geometry error: {0}")]
    RouteGeometry(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record store error: {0}")]
    Store(String),
}

impl AnalyticsError {
    /// Builds a store error and logs it, mirroring how storage failures
    /// are surfaced to operators before they propagate.
    pub fn store(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        error!("Record store error: {msg}");
        AnalyticsError::Store(msg)
    }

    /// True when the error came from the storage collaborator rather than
    /// from a single workout's data.
    pub fn is_store(&self) -> bool {
        matches!(self, AnalyticsError::Store(_))
    }
}

pub type Result<T, E = AnalyticsError> = std::result::Result<T, E>;
