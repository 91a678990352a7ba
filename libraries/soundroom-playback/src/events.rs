//! Playback Events
//!
//! Events produced by the state machine while a track is loaded:
//! - Progress samples (periodic while playing)
//! - Track end, raised exactly once per loaded entry

use serde::{Deserialize, Serialize};
use soundroom_core::EntryId;

/// Why a track ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The provider delivered its end-of-track notification
    ProviderReported,

    /// Sampled position reached the end of the track
    Completed,

    /// The provider went silent past duration + grace and the watchdog fired
    ProviderStuck,
}

/// Events emitted by the playback state machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Position update
    Progress {
        /// Elapsed time in seconds
        elapsed_seconds: f64,
        /// Track duration in seconds
        duration_seconds: f64,
    },

    /// The loaded entry finished; the queue should advance
    TrackEnded {
        /// Entry that ended
        entry_id: EntryId,
        /// What triggered the end
        reason: EndReason,
    },
}

impl PlaybackEvent {
    /// Progress fraction for `Progress` events
    pub fn progress(&self) -> Option<f64> {
        match self {
            Self::Progress {
                elapsed_seconds,
                duration_seconds,
            } if *duration_seconds > 0.0 => Some(elapsed_seconds / duration_seconds),
            _ => None,
        }
    }
}
