//! Soundroom Server Library
//!
//! HTTP and WebSocket surface over the room registry: catalog search, queue
//! commands, transport controls and a live snapshot stream per room.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod state;

// Re-export commonly used types for convenience
pub use api::create_router;
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use state::AppState;
