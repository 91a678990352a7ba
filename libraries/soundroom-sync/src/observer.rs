//! Observer capability: the receiving end of snapshot distribution

use crate::error::DeliveryError;
use async_trait::async_trait;
use soundroom_core::{ObserverId, PlaybackSnapshot};

/// A connected client receiving room snapshots
#[async_trait]
pub trait SnapshotObserver: Send + Sync {
    fn id(&self) -> ObserverId;

    /// Push one snapshot
    ///
    /// # Errors
    /// `Transport` failures are retried with backoff; `Disconnected` ends
    /// delivery to this observer.
    async fn deliver(&self, snapshot: &PlaybackSnapshot) -> Result<(), DeliveryError>;

    /// Degraded-delivery signal: `true` after repeated failures, `false` on
    /// the next success
    fn on_slow_connection(&self, slow: bool) {
        let _ = slow;
    }
}
