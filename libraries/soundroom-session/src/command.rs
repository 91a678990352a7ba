//! Messages into a room's coordinator task

use crate::error::Result;
use soundroom_core::{EntryId, PlaybackSnapshot, QueueEntry, Track, VoterId};
use soundroom_playback::PlaybackError;
use tokio::sync::oneshot;

pub(crate) type Reply<T> = oneshot::Sender<Result<T>>;

/// Commands from observers, via `SessionHandle`
pub(crate) enum SessionCommand {
    Enqueue {
        track: Track,
        user: VoterId,
        reply: Reply<QueueEntry>,
    },
    Vote {
        entry: EntryId,
        user: VoterId,
        reply: Reply<usize>,
    },
    Unvote {
        entry: EntryId,
        user: VoterId,
        reply: Reply<usize>,
    },
    RemoveEntry {
        entry: EntryId,
        user: VoterId,
        reply: Reply<QueueEntry>,
    },
    Pause {
        user: VoterId,
        reply: Reply<()>,
    },
    Resume {
        user: VoterId,
        reply: Reply<()>,
    },
    Seek {
        user: VoterId,
        seconds: f64,
        reply: Reply<f64>,
    },
    Snapshot {
        reply: Reply<PlaybackSnapshot>,
    },
}

/// Messages from the coordinator's own background tasks
pub(crate) enum InternalEvent {
    /// Provider login succeeded
    ProviderReady,

    /// Retry loading the pending entry
    RetryAdvance {
        reply: oneshot::Sender<std::result::Result<(), PlaybackError>>,
    },
}
