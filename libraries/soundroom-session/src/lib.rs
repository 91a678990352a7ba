//! Soundroom - Session Layer
//!
//! Composes the playback engine and the sync layer into rooms:
//! - `SessionCoordinator`: one task per room owning queue + state machine,
//!   advancing on track end and publishing snapshots
//! - `SessionHandle`: the observer command surface (vote, unvote, enqueue,
//!   remove, pause, resume, seek, subscribe)
//! - `RoomRegistry`: rooms by id, created on demand
//! - `ProviderRegistry`: playback providers selected by name
//!
//! # Example
//!
//! ```rust,no_run
//! use soundroom_core::{RoomId, VoterId};
//! use soundroom_playback::{PlaybackProvider, SimulatedProvider};
//! use soundroom_session::{
//!     ConfiguredPolicy, InMemoryCatalog, ProviderRegistry, RoomRegistry, SessionConfig,
//! };
//! use std::sync::Arc;
//!
//! # async fn demo() -> soundroom_session::Result<()> {
//! let mut providers = ProviderRegistry::new();
//! providers.register("simulated", |_| {
//!     Arc::new(SimulatedProvider::new("simulated")) as Arc<dyn PlaybackProvider>
//! });
//!
//! let rooms = RoomRegistry::new(
//!     SessionConfig::default(),
//!     providers,
//!     Arc::new(InMemoryCatalog::default()),
//!     Arc::new(ConfiguredPolicy::permissive()),
//! );
//!
//! let room = rooms.get_or_create(RoomId::new("lobby")).await?;
//! let entry = room.enqueue("sim:1", VoterId::new("alice")).await?;
//! room.vote(entry.id, VoterId::new("bob")).await?;
//! # Ok(())
//! # }
//! ```

mod catalog;
mod command;
pub mod config;
mod coordinator;
mod error;
mod handle;
mod policy;
mod providers;
mod registry;

pub use catalog::InMemoryCatalog;
pub use config::SessionConfig;
pub use coordinator::SessionCoordinator;
pub use error::{Result, SessionError};
pub use handle::SessionHandle;
pub use policy::ConfiguredPolicy;
pub use providers::{ProviderCredentials, ProviderRegistry};
pub use registry::RoomRegistry;
