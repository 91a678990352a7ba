//! Domain types shared across Soundroom crates

mod entry;
mod ids;
mod snapshot;
mod track;

pub use entry::QueueEntry;
pub use ids::{EntryId, ObserverId, RoomId, TrackId, VoterId};
pub use snapshot::{PlaybackSnapshot, PlaybackStatus};
pub use track::{Artwork, Track};
