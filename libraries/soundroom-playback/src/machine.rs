//! Playback state machine - authoritative transport state of a room
//!
//! ```text
//!            load_and_play            pause
//!   Idle ─────────────────▶ Playing ─────────▶ Paused
//!    ▲                        ▲  │               │
//!    │ finish                 │  └── resume ◀────┘
//!    └──── track ended ◀──────┘
//! ```
//!
//! The machine drives the provider, samples its position while playing and
//! raises `TrackEnded` exactly once per loaded entry. A watchdog force-ends
//! the track when the provider goes silent past duration + grace.

use crate::{
    error::{PlaybackError, ProviderError, Result},
    events::{EndReason, PlaybackEvent},
    provider::PlaybackProvider,
    types::MachineSettings,
};
use soundroom_core::{PlaybackStatus, QueueEntry};
use std::{future::Future, sync::Arc, time::Duration};
use tokio::time::{timeout, Instant};
use tracing::{debug, warn};

/// Authoritative playback status and progress for one room
pub struct PlaybackStateMachine {
    provider: Arc<dyn PlaybackProvider>,
    settings: MachineSettings,

    /// Login with the provider has succeeded
    provider_ready: bool,

    status: PlaybackStatus,
    current: Option<QueueEntry>,

    /// Elapsed seconds of the current entry
    elapsed: f64,

    /// Last position reported by the provider since play/resume/seek
    last_position: Option<f64>,

    /// Force-end point if the provider stays silent
    watchdog_deadline: Option<Instant>,

    /// `TrackEnded` was already raised for the current entry
    end_raised: bool,

    /// Uri of a track ended without the provider reporting it
    ///
    /// The provider's own notification for it may still arrive and must not
    /// end a later copy of the same track.
    unreported_end: Option<String>,
}

impl PlaybackStateMachine {
    /// Create an idle machine around `provider`
    ///
    /// The provider is treated as logged out until [`set_provider_ready`]
    /// is called.
    ///
    /// [`set_provider_ready`]: Self::set_provider_ready
    pub fn new(provider: Arc<dyn PlaybackProvider>, settings: MachineSettings) -> Self {
        Self {
            provider,
            settings,
            provider_ready: false,
            status: PlaybackStatus::Idle,
            current: None,
            elapsed: 0.0,
            last_position: None,
            watchdog_deadline: None,
            end_raised: false,
            unreported_end: None,
        }
    }

    // ===== State Queries =====

    pub fn provider(&self) -> &Arc<dyn PlaybackProvider> {
        &self.provider
    }

    pub fn settings(&self) -> &MachineSettings {
        &self.settings
    }

    pub fn set_provider_ready(&mut self, ready: bool) {
        self.provider_ready = ready;
    }

    pub fn is_provider_ready(&self) -> bool {
        self.provider_ready
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    /// Entry currently loaded
    pub fn current(&self) -> Option<&QueueEntry> {
        self.current.as_ref()
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed
    }

    /// Duration of the current entry, 0 when idle
    pub fn duration_seconds(&self) -> f64 {
        self.current
            .as_ref()
            .map_or(0.0, |entry| entry.track.duration_seconds())
    }

    /// Whether progress sampling should run
    ///
    /// Sampling is suspended while paused, idle, or once the end was raised.
    pub fn is_sampling(&self) -> bool {
        self.status == PlaybackStatus::Playing && !self.end_raised
    }

    pub fn watchdog_deadline(&self) -> Option<Instant> {
        self.watchdog_deadline
    }

    // ===== Playback Control =====

    /// Load `entry` and start playing it from the beginning
    ///
    /// Valid from any status; a loaded track is replaced. State only changes
    /// once the provider accepted the track, so a failed call leaves the
    /// machine as it was.
    pub async fn load_and_play(&mut self, entry: &QueueEntry) -> Result<()> {
        if !self.provider_ready {
            return Err(PlaybackError::ProviderUnavailable);
        }

        let provider = Arc::clone(&self.provider);
        let limit = self.settings.provider_call_timeout();
        bounded(limit, provider.play(&entry.track)).await?;

        let mut start = 0.0;
        if let Some(tail) = self.settings.skip_to_tail_seconds {
            let duration = entry.track.duration_seconds();
            if duration > tail {
                match bounded(limit, provider.seek(duration - tail)).await {
                    Ok(()) => start = duration - tail,
                    Err(err) => warn!(error = %err, "skip-to-tail seek failed"),
                }
            }
        }

        debug!(entry = %entry.id, track = %entry.track.id, "loaded track");
        if self
            .unreported_end
            .as_deref()
            .is_some_and(|uri| uri != entry.track.uri)
        {
            self.unreported_end = None;
        }
        self.status = PlaybackStatus::Playing;
        self.current = Some(entry.clone());
        self.elapsed = start;
        self.last_position = None;
        self.end_raised = false;
        self.arm_watchdog(Instant::now());
        Ok(())
    }

    /// Pause playback
    ///
    /// Pausing while already paused is a no-op.
    pub async fn pause(&mut self) -> Result<()> {
        match self.status {
            PlaybackStatus::Idle => Err(invalid("pause", self.status)),
            PlaybackStatus::Paused => Ok(()),
            PlaybackStatus::Playing => {
                let provider = Arc::clone(&self.provider);
                bounded(self.settings.provider_call_timeout(), provider.pause()).await?;
                self.status = PlaybackStatus::Paused;
                self.watchdog_deadline = None;
                Ok(())
            }
        }
    }

    /// Resume playback
    ///
    /// Position tracking restarts from the provider's next report, so the
    /// pause gap is never counted as elapsed time.
    pub async fn resume(&mut self) -> Result<()> {
        match self.status {
            PlaybackStatus::Idle => Err(invalid("resume", self.status)),
            PlaybackStatus::Playing => Ok(()),
            PlaybackStatus::Paused => {
                let provider = Arc::clone(&self.provider);
                bounded(self.settings.provider_call_timeout(), provider.resume()).await?;
                self.status = PlaybackStatus::Playing;
                self.last_position = None;
                self.arm_watchdog(Instant::now());
                Ok(())
            }
        }
    }

    /// Move the playhead, clamped to `[0, duration)`
    ///
    /// Returns the position actually applied. Status is unchanged.
    pub async fn seek(&mut self, seconds: f64) -> Result<f64> {
        if self.status == PlaybackStatus::Idle {
            return Err(invalid("seek", self.status));
        }
        if self.current.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }

        let target = clamp_position(seconds, self.duration_seconds());
        let provider = Arc::clone(&self.provider);
        bounded(self.settings.provider_call_timeout(), provider.seek(target)).await?;

        self.elapsed = target;
        self.last_position = None;
        if self.status == PlaybackStatus::Playing {
            self.arm_watchdog(Instant::now());
        }
        Ok(target)
    }

    // ===== Progress =====

    /// Take one progress sample
    ///
    /// Returns `Progress` while the track runs, or `TrackEnded` once when
    /// either the end is reached or the watchdog expires. Returns `None`
    /// when sampling is suspended.
    pub async fn sample(&mut self) -> Option<PlaybackEvent> {
        if !self.is_sampling() {
            return None;
        }

        let duration = self.duration_seconds();
        let provider = Arc::clone(&self.provider);
        match bounded(self.settings.sample_interval(), provider.current_position_seconds()).await {
            Ok(position) if position.is_finite() => {
                let advanced = self
                    .last_position
                    .map_or(true, |last| (position - last).abs() > f64::EPSILON);
                if advanced {
                    self.elapsed = position.clamp(0.0, duration);
                    self.last_position = Some(position);
                    self.arm_watchdog(Instant::now());
                }
            }
            Ok(position) => debug!(position, "ignoring non-finite provider position"),
            Err(err) => debug!(error = %err, "position sample failed"),
        }

        if self.elapsed >= duration - self.settings.end_epsilon_seconds {
            return self.raise_end(EndReason::Completed);
        }

        if self
            .watchdog_deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
        {
            let track = self.current.as_ref().map(|e| e.track.id.to_string());
            warn!(
                track = track.as_deref().unwrap_or_default(),
                duration_secs = duration,
                grace_secs = self.settings.watchdog_grace_secs,
                "ProviderStuck: no end-of-track or progress from provider, forcing track end"
            );
            return self.raise_end(EndReason::ProviderStuck);
        }

        Some(PlaybackEvent::Progress {
            elapsed_seconds: self.elapsed,
            duration_seconds: duration,
        })
    }

    /// Handle the provider's end-of-track notification
    ///
    /// Notifications for another uri, or after the end was already raised,
    /// are stale and ignored. So is the first notification for a track the
    /// machine ended itself, even when the same track was loaded again.
    pub fn on_provider_end(&mut self, track_uri: &str) -> Option<PlaybackEvent> {
        if self.unreported_end.as_deref() == Some(track_uri) {
            self.unreported_end = None;
            debug!(track_uri, "ignoring late end-of-track for a track already ended");
            return None;
        }

        if self.status == PlaybackStatus::Idle || self.end_raised {
            return None;
        }

        let matches = self
            .current
            .as_ref()
            .is_some_and(|entry| entry.track.uri == track_uri);
        if !matches {
            debug!(track_uri, "ignoring stale end-of-track");
            return None;
        }

        self.elapsed = self.duration_seconds();
        self.raise_end(EndReason::ProviderReported)
    }

    /// Unload the current entry and return to `Idle`
    pub fn finish(&mut self) -> Option<QueueEntry> {
        self.status = PlaybackStatus::Idle;
        self.elapsed = 0.0;
        self.last_position = None;
        self.watchdog_deadline = None;
        self.end_raised = false;
        self.current.take()
    }

    fn raise_end(&mut self, reason: EndReason) -> Option<PlaybackEvent> {
        let entry = self.current.as_ref()?;
        let entry_id = entry.id;
        if reason != EndReason::ProviderReported {
            self.unreported_end = Some(entry.track.uri.clone());
        }
        self.end_raised = true;
        self.watchdog_deadline = None;
        Some(PlaybackEvent::TrackEnded { entry_id, reason })
    }

    fn arm_watchdog(&mut self, now: Instant) {
        let remaining = (self.duration_seconds() - self.elapsed).max(0.0);
        self.watchdog_deadline =
            Some(now + Duration::from_secs_f64(remaining) + self.settings.watchdog_grace());
    }
}

fn invalid(operation: &'static str, status: PlaybackStatus) -> PlaybackError {
    PlaybackError::InvalidTransition { operation, status }
}

/// Clamp a requested position into `[0, duration)`
fn clamp_position(seconds: f64, duration: f64) -> f64 {
    let upper = (duration - 0.001).max(0.0);
    if seconds.is_finite() {
        seconds.clamp(0.0, upper)
    } else {
        0.0
    }
}

/// Bound a provider call so a hung provider cannot stall the room
async fn bounded<T>(
    limit: Duration,
    call: impl Future<Output = std::result::Result<T, ProviderError>>,
) -> std::result::Result<T, ProviderError> {
    timeout(limit, call)
        .await
        .map_err(|_| ProviderError::Transport(format!("provider call timed out after {:?}", limit)))?
}
