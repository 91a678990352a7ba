/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use soundroom_core::SoundroomError;
use soundroom_playback::{PlaybackError, QueueError};
use soundroom_session::SessionError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid entry id: {0}")]
    InvalidEntryId(#[from] uuid::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SessionError> for ServerError {
    fn from(err: SessionError) -> Self {
        let message = err.to_string();
        match err {
            SessionError::Queue(QueueError::NotFound(_))
            | SessionError::RoomNotFound(_)
            | SessionError::Catalog(SoundroomError::TrackNotFound(_)) => Self::NotFound(message),
            SessionError::Queue(QueueError::AlreadyVoted { .. } | QueueError::NotVoted { .. }) => {
                Self::Conflict(message)
            }
            SessionError::Forbidden => Self::Forbidden,
            SessionError::Playback(PlaybackError::ProviderUnavailable | PlaybackError::Provider(_))
            | SessionError::SessionClosed => Self::Unavailable(message),
            SessionError::Playback(
                PlaybackError::InvalidTransition { .. } | PlaybackError::NoTrackLoaded,
            )
            | SessionError::Catalog(SoundroomError::InvalidInput(_))
            | SessionError::UnknownProvider(_) => Self::BadRequest(message),
            SessionError::Timeout(_) => Self::Timeout(message),
            SessionError::Catalog(_) => Self::Unavailable(message),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ServerError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg),
            ServerError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden".to_string()),
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ServerError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServerError::InvalidEntryId(ref e) => {
                (StatusCode::BAD_REQUEST, format!("Invalid entry id: {}", e))
            }
            ServerError::Unavailable(msg) => {
                tracing::warn!("Service unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, msg)
            }
            ServerError::Timeout(msg) => {
                tracing::warn!("Upstream timeout: {}", msg);
                (StatusCode::GATEWAY_TIMEOUT, msg)
            }
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                )
            }
            ServerError::Io(ref e) => {
                tracing::error!("IO error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "IO error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
