/// Session error types
use soundroom_core::{RoomId, SoundroomError};
use soundroom_playback::{PlaybackError, QueueError};
use thiserror::Error;

/// Result type alias using `SessionError`
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors surfaced to the requester of a session command
///
/// None of these are ever published in a snapshot.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Queue input error (`AlreadyVoted`, `NotVoted`, `NotFound`)
    #[error(transparent)]
    Queue(#[from] QueueError),

    /// Transport command failed
    #[error(transparent)]
    Playback(#[from] PlaybackError),

    /// Catalog lookup failed
    #[error(transparent)]
    Catalog(#[from] SoundroomError),

    /// The access policy denied the command
    #[error("Forbidden")]
    Forbidden,

    /// The room's coordinator has stopped
    #[error("Session closed")]
    SessionClosed,

    /// No room with this id
    #[error("Room not found: {0}")]
    RoomNotFound(RoomId),

    /// No provider is registered under this name
    #[error("Unknown or disabled provider: {0}")]
    UnknownProvider(String),

    /// An external call did not finish in time
    #[error("{0} timed out")]
    Timeout(&'static str),
}
