//! Error types for delivery and retry loops

use soundroom_core::Transient;
use thiserror::Error;

/// Snapshot delivery failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The observer is gone; its delivery loop ends
    #[error("Observer disconnected")]
    Disconnected,

    /// The push failed but the observer may still be reachable
    #[error("Delivery failed: {0}")]
    Transport(String),
}

impl Transient for DeliveryError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Why a retry loop stopped without a value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetryAbort<E> {
    /// The owning operation was superseded
    #[error("Retry cancelled")]
    Cancelled,

    /// The operation failed in a way retrying cannot fix
    #[error(transparent)]
    Permanent(E),
}

impl<E> RetryAbort<E> {
    /// The permanent error, if any
    pub fn into_permanent(self) -> Option<E> {
        match self {
            Self::Cancelled => None,
            Self::Permanent(err) => Some(err),
        }
    }
}
