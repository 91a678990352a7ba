//! Soundroom Core
//!
//! Shared domain types, capability traits, and error handling for Soundroom.
//!
//! This crate is the vocabulary every other Soundroom crate speaks: the
//! playback engine, the sync layer, the per-room session actor and the
//! server surface all exchange the types defined here.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `QueueEntry`, `PlaybackSnapshot`, and the id newtypes
//! - **Capability Traits**: `Catalog` (search / metadata) and `AccessPolicy` (authorization)
//! - **Error Handling**: `SoundroomError` and `Result`
//!
//! # Example
//!
//! ```rust
//! use soundroom_core::types::{QueueEntry, Track, TrackId, VoterId};
//!
//! let track = Track::new(TrackId::new("t1"), "Song", "provider:track:t1", 180_000);
//! let entry = QueueEntry::new(track, VoterId::new("alice"), 1);
//!
//! assert_eq!(entry.vote_count(), 0);
//! assert_eq!(entry.track.duration_seconds(), 180.0);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{Result, SoundroomError};
pub use traits::{AccessPolicy, Catalog, Transient};

pub use types::{
    Artwork, EntryId, ObserverId, PlaybackSnapshot, PlaybackStatus, QueueEntry, RoomId, Track,
    TrackId, VoterId,
};
