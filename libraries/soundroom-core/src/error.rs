/// Core error types for Soundroom
use thiserror::Error;

/// Result type alias using `SoundroomError`
pub type Result<T> = std::result::Result<T, SoundroomError>;

/// Errors raised by the external capabilities (catalog, identity)
#[derive(Error, Debug)]
pub enum SoundroomError {
    /// No catalog track matches the given reference
    #[error("Track not found: {0}")]
    TrackNotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Network error while talking to an external capability
    #[error("Network error: {0}")]
    Network(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl SoundroomError {
    /// Create a track-not-found error
    pub fn track_not_found(uri: impl Into<String>) -> Self {
        Self::TrackNotFound(uri.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }
}
