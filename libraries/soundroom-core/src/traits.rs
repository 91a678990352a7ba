/// Capability traits consumed by the session engine
use crate::error::Result;
use crate::types::{QueueEntry, Track, VoterId};
use async_trait::async_trait;

/// Read-only music catalog
///
/// Implementers wrap an external catalog or search service. The engine never
/// mutates catalog data; it only resolves references into [`Track`]s.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Free-text search over the catalog
    ///
    /// # Errors
    /// Returns an error if the catalog cannot be reached
    async fn search(&self, text: &str) -> Result<Vec<Track>>;

    /// Resolve a provider-specific uri into full track metadata
    ///
    /// # Errors
    /// Returns `TrackNotFound` if the uri does not resolve
    async fn track_metadata(&self, uri: &str) -> Result<Track>;
}

/// Authorization decisions for policy-gated commands
///
/// The engine only calls these at the command site; the rules themselves
/// belong to the identity service behind this trait.
pub trait AccessPolicy: Send + Sync {
    /// Whether `user` may remove `entry` from the queue
    fn can_remove_track(&self, entry: &QueueEntry, user: &VoterId) -> bool;

    /// Whether `user` may pause, resume or seek the room's playback
    fn can_control_playback(&self, user: &VoterId) -> bool;
}

/// Failure classification used by retry loops
///
/// Transient failures are worth another attempt; everything else aborts the
/// loop immediately.
pub trait Transient {
    /// Whether another attempt may succeed
    fn is_transient(&self) -> bool;
}

impl Transient for crate::error::SoundroomError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}
