//! In-process playback provider
//!
//! Plays nothing; its playhead follows the tokio clock and it emits
//! `EndOfTrack` when a track runs out. Useful when no external provider is
//! wired and for exercising the engine under paused time.

use crate::{
    error::ProviderError,
    provider::{PlaybackProvider, ProviderEvent},
};
use async_trait::async_trait;
use soundroom_core::Track;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Default)]
struct SimState {
    logged_in: bool,
    /// Uri and duration of the loaded track
    track: Option<(String, f64)>,
    /// Position accumulated up to `started_at`
    offset: f64,
    /// Set while playing
    started_at: Option<Instant>,
    /// Bumped on every transport change to invalidate pending end timers
    generation: u64,
}

impl SimState {
    fn position(&self) -> f64 {
        let running = self
            .started_at
            .map_or(0.0, |started| started.elapsed().as_secs_f64());
        let duration = self.track.as_ref().map_or(0.0, |(_, d)| *d);
        (self.offset + running).min(duration)
    }
}

/// Provider backed by the tokio clock
pub struct SimulatedProvider {
    name: String,
    state: Arc<Mutex<SimState>>,
    events: broadcast::Sender<ProviderEvent>,
}

impl SimulatedProvider {
    /// Create a logged-out simulated provider
    pub fn new(name: impl Into<String>) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(SimState::default())),
            events,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn require_login(state: &SimState) -> Result<(), ProviderError> {
        if state.logged_in {
            Ok(())
        } else {
            Err(ProviderError::Unauthenticated)
        }
    }

    /// Emit `EndOfTrack` when the current track runs out, unless the
    /// transport changes first
    fn schedule_end(&self, state: &SimState) {
        let Some((uri, duration)) = state.track.clone() else {
            return;
        };
        let remaining = (duration - state.position()).max(0.0);
        let generation = state.generation;
        let shared = Arc::clone(&self.state);
        let events = self.events.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs_f64(remaining)).await;
            let mut state = shared.lock().unwrap_or_else(PoisonError::into_inner);
            if state.generation != generation || state.started_at.is_none() {
                return;
            }
            state.offset = duration;
            state.started_at = None;
            drop(state);

            debug!(track_uri = %uri, "simulated track finished");
            let _ = events.send(ProviderEvent::EndOfTrack { track_uri: uri });
        });
    }
}

#[async_trait]
impl PlaybackProvider for SimulatedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn login(&self) -> Result<(), ProviderError> {
        self.lock().logged_in = true;
        Ok(())
    }

    async fn play(&self, track: &Track) -> Result<(), ProviderError> {
        let mut state = self.lock();
        Self::require_login(&state)?;
        state.track = Some((track.uri.clone(), track.duration_seconds()));
        state.offset = 0.0;
        state.started_at = Some(Instant::now());
        state.generation += 1;
        self.schedule_end(&state);
        Ok(())
    }

    async fn pause(&self) -> Result<(), ProviderError> {
        let mut state = self.lock();
        Self::require_login(&state)?;
        state.offset = state.position();
        state.started_at = None;
        state.generation += 1;
        Ok(())
    }

    async fn resume(&self) -> Result<(), ProviderError> {
        let mut state = self.lock();
        Self::require_login(&state)?;
        if state.track.is_some() && state.started_at.is_none() {
            state.started_at = Some(Instant::now());
            state.generation += 1;
            self.schedule_end(&state);
        }
        Ok(())
    }

    async fn seek(&self, seconds: f64) -> Result<(), ProviderError> {
        let mut state = self.lock();
        Self::require_login(&state)?;
        let playing = state.started_at.is_some();
        state.offset = seconds.max(0.0);
        state.generation += 1;
        if playing {
            state.started_at = Some(Instant::now());
            self.schedule_end(&state);
        }
        Ok(())
    }

    async fn current_position_seconds(&self) -> Result<f64, ProviderError> {
        let state = self.lock();
        Self::require_login(&state)?;
        Ok(state.position())
    }

    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }
}
