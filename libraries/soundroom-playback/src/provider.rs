//! Playback provider capability
//!
//! The provider is the external media transport. The engine drives it through
//! this narrow interface and never assumes it is logged in at startup.

use crate::error::ProviderError;
use async_trait::async_trait;
use soundroom_core::Track;
use tokio::sync::broadcast;

/// Notifications pushed by a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// The provider finished playing the track with this uri
    EndOfTrack { track_uri: String },
}

/// External media transport
///
/// # Example
///
/// ```rust,no_run
/// use async_trait::async_trait;
/// use soundroom_core::Track;
/// use soundroom_playback::{PlaybackProvider, ProviderError, ProviderEvent};
/// use tokio::sync::broadcast;
///
/// struct Remote {
///     events: broadcast::Sender<ProviderEvent>,
/// }
///
/// #[async_trait]
/// impl PlaybackProvider for Remote {
///     fn name(&self) -> &str { "remote" }
///     async fn login(&self) -> Result<(), ProviderError> { Ok(()) }
///     async fn play(&self, _track: &Track) -> Result<(), ProviderError> { Ok(()) }
///     async fn pause(&self) -> Result<(), ProviderError> { Ok(()) }
///     async fn resume(&self) -> Result<(), ProviderError> { Ok(()) }
///     async fn seek(&self, _seconds: f64) -> Result<(), ProviderError> { Ok(()) }
///     async fn current_position_seconds(&self) -> Result<f64, ProviderError> { Ok(0.0) }
///     fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> { self.events.subscribe() }
/// }
/// ```
#[async_trait]
pub trait PlaybackProvider: Send + Sync {
    /// Registry name of this provider
    fn name(&self) -> &str;

    /// Establish a session with the provider
    ///
    /// # Errors
    /// `AuthFailure` if the credentials are rejected, `Transport` if the
    /// provider could not be reached
    async fn login(&self) -> Result<(), ProviderError>;

    /// Start playing `track` from the beginning
    async fn play(&self, track: &Track) -> Result<(), ProviderError>;

    /// Pause the current track
    async fn pause(&self) -> Result<(), ProviderError>;

    /// Resume the current track
    async fn resume(&self) -> Result<(), ProviderError>;

    /// Move the playhead of the current track
    async fn seek(&self, seconds: f64) -> Result<(), ProviderError>;

    /// Playhead of the current track
    async fn current_position_seconds(&self) -> Result<f64, ProviderError>;

    /// Subscribe to provider notifications
    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent>;
}
