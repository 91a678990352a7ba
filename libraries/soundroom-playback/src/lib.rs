//! Soundroom - Playback Engine
//!
//! The authoritative playback core of a room.
//!
//! This crate provides:
//! - `QueueManager`: pending entries ordered by upvotes, ties broken by arrival
//! - `PlaybackStateMachine`: Idle / Playing / Paused transport, progress
//!   sampling and an end-of-track watchdog
//! - `PlaybackProvider`: the capability the machine drives (login, play,
//!   pause, resume, seek, position, end-of-track events)
//! - `SimulatedProvider`: a clock-driven provider for local use and tests
//!
//! # Architecture
//!
//! Nothing here spawns the machine or owns a room. The session layer owns one
//! queue and one machine per room and serializes every call to them; this
//! crate only guarantees that each operation either fully applies or leaves
//! state untouched.
//!
//! # Example: Queue ordering
//!
//! ```rust
//! use soundroom_core::{Track, TrackId, VoterId};
//! use soundroom_playback::QueueManager;
//!
//! let mut queue = QueueManager::new();
//! let a = queue.enqueue(Track::new(TrackId::new("a"), "A", "sim:a", 1_000), VoterId::new("ann"));
//! let b = queue.enqueue(Track::new(TrackId::new("b"), "B", "sim:b", 1_000), VoterId::new("ann"));
//!
//! queue.add_vote(b.id, VoterId::new("bob")).unwrap();
//! assert_eq!(queue.pop_next().map(|e| e.id), Some(b.id));
//! assert_eq!(queue.pop_next().map(|e| e.id), Some(a.id));
//! assert!(queue.pop_next().is_none());
//! ```

mod error;
pub mod events;
mod machine;
mod provider;
mod queue;
mod simulated;
pub mod types;

// Public exports
pub use error::{PlaybackError, ProviderError, QueueError, Result};
pub use events::{EndReason, PlaybackEvent};
pub use machine::PlaybackStateMachine;
pub use provider::{PlaybackProvider, ProviderEvent};
pub use queue::{rank_order, QueueManager};
pub use simulated::SimulatedProvider;
pub use types::MachineSettings;
