//! Cloneable handle to a running room

use crate::{
    command::{Reply, SessionCommand},
    error::{Result, SessionError},
};
use soundroom_core::{
    Catalog, EntryId, PlaybackSnapshot, QueueEntry, RoomId, VoterId,
};
use soundroom_sync::{ObserverRegistration, SnapshotObserver, SyncDistributor};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

/// Entry point for every observer command on one room
///
/// Commands are queued to the room's coordinator and answered in arrival
/// order. Errors go back to the caller only.
#[derive(Clone)]
pub struct SessionHandle {
    room: RoomId,
    commands: mpsc::Sender<SessionCommand>,
    distributor: SyncDistributor,
    catalog: Arc<dyn Catalog>,
    catalog_timeout: Duration,
    shutdown: CancellationToken,
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("room", &self.room)
            .field("catalog_timeout", &self.catalog_timeout)
            .finish_non_exhaustive()
    }
}

impl SessionHandle {
    pub(crate) fn new(
        room: RoomId,
        commands: mpsc::Sender<SessionCommand>,
        distributor: SyncDistributor,
        catalog: Arc<dyn Catalog>,
        catalog_timeout: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            room,
            commands,
            distributor,
            catalog,
            catalog_timeout,
            shutdown,
        }
    }

    pub fn room(&self) -> &RoomId {
        &self.room
    }

    // ===== Queue =====

    /// Resolve `uri` through the catalog and queue it
    ///
    /// The lookup runs before the command reaches the room, so a slow catalog
    /// never stalls other commands.
    pub async fn enqueue(&self, uri: &str, user: VoterId) -> Result<QueueEntry> {
        let track = timeout(self.catalog_timeout, self.catalog.track_metadata(uri))
            .await
            .map_err(|_| SessionError::Timeout("catalog lookup"))??;

        self.request(|reply| SessionCommand::Enqueue { track, user, reply })
            .await
    }

    /// Upvote an entry; returns the new vote count
    pub async fn vote(&self, entry: EntryId, user: VoterId) -> Result<usize> {
        self.request(|reply| SessionCommand::Vote { entry, user, reply })
            .await
    }

    /// Withdraw an upvote; returns the new vote count
    pub async fn unvote(&self, entry: EntryId, user: VoterId) -> Result<usize> {
        self.request(|reply| SessionCommand::Unvote { entry, user, reply })
            .await
    }

    /// Remove an entry, subject to the access policy
    pub async fn remove_entry(&self, entry: EntryId, user: VoterId) -> Result<QueueEntry> {
        self.request(|reply| SessionCommand::RemoveEntry { entry, user, reply })
            .await
    }

    // ===== Transport =====

    pub async fn pause(&self, user: VoterId) -> Result<()> {
        self.request(|reply| SessionCommand::Pause { user, reply })
            .await
    }

    pub async fn resume(&self, user: VoterId) -> Result<()> {
        self.request(|reply| SessionCommand::Resume { user, reply })
            .await
    }

    /// Seek the current track; returns the clamped position applied
    pub async fn seek(&self, user: VoterId, seconds: f64) -> Result<f64> {
        self.request(|reply| SessionCommand::Seek {
            user,
            seconds,
            reply,
        })
        .await
    }

    // ===== Observation =====

    /// Current snapshot, serialized after every command sent before it
    pub async fn snapshot(&self) -> Result<PlaybackSnapshot> {
        self.request(|reply| SessionCommand::Snapshot { reply }).await
    }

    /// Latest published snapshot without a round trip to the room
    pub fn latest_snapshot(&self) -> Option<Arc<PlaybackSnapshot>> {
        self.distributor.latest()
    }

    /// Subscribe an observer: current snapshot first, then every change
    pub fn connect(&self, observer: Arc<dyn SnapshotObserver>) -> ObserverRegistration {
        self.distributor.connect(observer)
    }

    pub fn observer_count(&self) -> usize {
        self.distributor.observer_count()
    }

    // ===== Lifecycle =====

    /// Tear the room down: stops the coordinator, all retries and deliveries
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.shutdown.is_cancelled() || self.commands.is_closed()
    }

    async fn request<T>(&self, build: impl FnOnce(Reply<T>) -> SessionCommand) -> Result<T> {
        if self.shutdown.is_cancelled() {
            return Err(SessionError::SessionClosed);
        }

        let (reply, response) = oneshot::channel();
        self.commands
            .send(build(reply))
            .await
            .map_err(|_| SessionError::SessionClosed)?;
        response.await.map_err(|_| SessionError::SessionClosed)?
    }
}
