//! Error types for queue and playback management

use soundroom_core::{EntryId, PlaybackStatus, Transient, VoterId};
use thiserror::Error;

/// Queue mutation errors
///
/// These are caller-input conditions: they are reported to the requester and
/// never change the queue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// The voter already upvoted this entry
    #[error("{voter} already voted for entry {entry}")]
    AlreadyVoted { entry: EntryId, voter: VoterId },

    /// The voter has no vote on this entry to remove
    #[error("{voter} has not voted for entry {entry}")]
    NotVoted { entry: EntryId, voter: VoterId },

    /// No entry with this id is queued
    #[error("Entry not found: {0}")]
    NotFound(EntryId),
}

/// Failures reported by a playback provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Credentials were rejected; retrying will not help
    #[error("Authentication failed: {0}")]
    AuthFailure(String),

    /// The provider has no logged-in session
    #[error("Provider is not logged in")]
    Unauthenticated,

    /// Transport failure or timeout talking to the provider
    #[error("Provider transport error: {0}")]
    Transport(String),
}

impl Transient for ProviderError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Playback state machine errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// Login with the external provider has not succeeded
    #[error("Playback provider unavailable")]
    ProviderUnavailable,

    /// The command is not valid from the current status
    #[error("Cannot {operation} while {status}")]
    InvalidTransition {
        operation: &'static str,
        status: PlaybackStatus,
    },

    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// The provider rejected or failed the call
    #[error(transparent)]
    Provider(ProviderError),
}

impl From<ProviderError> for PlaybackError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Unauthenticated => Self::ProviderUnavailable,
            other => Self::Provider(other),
        }
    }
}

impl Transient for PlaybackError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::Provider(err) if err.is_transient())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
