/// Playback snapshot types broadcast to observers
use crate::types::{QueueEntry, RoomId};
use serde::{Deserialize, Serialize};

/// Transport status of a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    /// No track loaded
    #[default]
    Idle,
    Playing,
    Paused,
}

impl PlaybackStatus {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Playing => "playing",
            Self::Paused => "paused",
        }
    }
}

impl std::fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Complete, authoritative description of a room's playback and queue
///
/// Snapshots are rebuilt from scratch on every change and carry nothing
/// observer-specific, so any observer can be handed the latest one at any
/// time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    /// Room this snapshot describes
    pub room: RoomId,

    /// Transport status
    pub status: PlaybackStatus,

    /// Entry currently loaded, empty when idle
    pub current_entry: Option<QueueEntry>,

    /// Elapsed time of the current entry in seconds
    pub elapsed_seconds: f64,

    /// Duration of the current entry in seconds, 0 when idle
    pub duration_seconds: f64,

    /// Pending entries in play order
    pub queue: Vec<QueueEntry>,
}

impl PlaybackSnapshot {
    /// Snapshot of a room with nothing loaded and nothing queued
    pub fn idle(room: RoomId) -> Self {
        Self {
            room,
            status: PlaybackStatus::Idle,
            current_entry: None,
            elapsed_seconds: 0.0,
            duration_seconds: 0.0,
            queue: Vec::new(),
        }
    }

    /// Progress fraction in `[0, 1]`
    pub fn progress(&self) -> f64 {
        if self.duration_seconds <= 0.0 {
            return 0.0;
        }
        (self.elapsed_seconds / self.duration_seconds).clamp(0.0, 1.0)
    }
}
