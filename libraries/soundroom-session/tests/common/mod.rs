//! Shared fixtures for session integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use soundroom_core::{ObserverId, PlaybackSnapshot, RoomId, Track, TrackId};
use soundroom_playback::{PlaybackProvider, ProviderError, ProviderEvent};
use soundroom_session::{ConfiguredPolicy, InMemoryCatalog, SessionConfig, SessionCoordinator, SessionHandle};
use soundroom_sync::{DeliveryError, SnapshotObserver};
use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

pub const TRACK_SECS: u64 = 180;

/// Provider controlled entirely by the test
///
/// Its position only moves when the test sets it, so a test can simulate a
/// provider that hangs mid-track.
pub struct FakeProvider {
    position: Mutex<f64>,
    login_failures: AtomicUsize,
    reject_login: AtomicBool,
    login_attempts: AtomicUsize,
    play_failures: AtomicUsize,
    play_errors: Mutex<VecDeque<ProviderError>>,
    play_attempts: AtomicUsize,
    played: Mutex<Vec<String>>,
    calls: Mutex<Vec<String>>,
    events: broadcast::Sender<ProviderEvent>,
}

impl FakeProvider {
    pub fn new() -> Arc<Self> {
        let (events, _) = broadcast::channel(16);
        Arc::new(Self {
            position: Mutex::new(0.0),
            login_failures: AtomicUsize::new(0),
            reject_login: AtomicBool::new(false),
            login_attempts: AtomicUsize::new(0),
            play_failures: AtomicUsize::new(0),
            play_errors: Mutex::new(VecDeque::new()),
            play_attempts: AtomicUsize::new(0),
            played: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            events,
        })
    }

    pub fn set_position(&self, seconds: f64) {
        *self.position.lock().unwrap() = seconds;
    }

    /// Fail the next `count` logins with a transport error
    pub fn fail_logins(&self, count: usize) {
        self.login_failures.store(count, Ordering::SeqCst);
    }

    /// Reject every login as an auth failure
    pub fn reject_logins(&self) {
        self.reject_login.store(true, Ordering::SeqCst);
    }

    /// Fail the next `count` play calls with a transport error
    pub fn fail_plays(&self, count: usize) {
        self.play_failures.store(count, Ordering::SeqCst);
    }

    /// Fail the next play calls with these errors, in order
    ///
    /// Scripted errors are used before any `fail_plays` count.
    pub fn script_play_errors(&self, errors: impl IntoIterator<Item = ProviderError>) {
        self.play_errors.lock().unwrap().extend(errors);
    }

    pub fn login_attempts(&self) -> usize {
        self.login_attempts.load(Ordering::SeqCst)
    }

    pub fn play_attempts(&self) -> usize {
        self.play_attempts.load(Ordering::SeqCst)
    }

    /// Uris successfully started, in order
    pub fn played(&self) -> Vec<String> {
        self.played.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Emit the provider's end-of-track notification
    pub fn end_track(&self, uri: &str) {
        let _ = self.events.send(ProviderEvent::EndOfTrack {
            track_uri: uri.to_string(),
        });
    }

    fn take_failure(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl PlaybackProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    async fn login(&self) -> Result<(), ProviderError> {
        self.login_attempts.fetch_add(1, Ordering::SeqCst);
        if self.reject_login.load(Ordering::SeqCst) {
            return Err(ProviderError::AuthFailure("invalid client secret".into()));
        }
        if Self::take_failure(&self.login_failures) {
            return Err(ProviderError::Transport("connection refused".into()));
        }
        Ok(())
    }

    async fn play(&self, track: &Track) -> Result<(), ProviderError> {
        self.play_attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.play_errors.lock().unwrap().pop_front() {
            return Err(err);
        }
        if Self::take_failure(&self.play_failures) {
            return Err(ProviderError::Transport("connection reset".into()));
        }
        self.set_position(0.0);
        self.played.lock().unwrap().push(track.uri.clone());
        self.calls.lock().unwrap().push(format!("play {}", track.uri));
        Ok(())
    }

    async fn pause(&self) -> Result<(), ProviderError> {
        self.calls.lock().unwrap().push("pause".into());
        Ok(())
    }

    async fn resume(&self) -> Result<(), ProviderError> {
        self.calls.lock().unwrap().push("resume".into());
        Ok(())
    }

    async fn seek(&self, seconds: f64) -> Result<(), ProviderError> {
        self.set_position(seconds);
        self.calls.lock().unwrap().push(format!("seek {}", seconds));
        Ok(())
    }

    async fn current_position_seconds(&self) -> Result<f64, ProviderError> {
        Ok(*self.position.lock().unwrap())
    }

    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }
}

/// Observer that records every snapshot it receives
pub struct RecordingObserver {
    id: ObserverId,
    received: Mutex<Vec<PlaybackSnapshot>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            id: ObserverId::generate(),
            received: Mutex::new(Vec::new()),
        })
    }

    pub fn received(&self) -> Vec<PlaybackSnapshot> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl SnapshotObserver for RecordingObserver {
    fn id(&self) -> ObserverId {
        self.id
    }

    async fn deliver(&self, snapshot: &PlaybackSnapshot) -> Result<(), DeliveryError> {
        self.received.lock().unwrap().push(snapshot.clone());
        Ok(())
    }
}

pub fn create_track(id: &str) -> Track {
    Track::new(
        TrackId::new(id),
        format!("Track {}", id.to_uppercase()),
        format!("sim:{}", id),
        TRACK_SECS * 1000,
    )
    .with_artist("Test Artist")
}

pub fn catalog() -> Arc<InMemoryCatalog> {
    Arc::new(InMemoryCatalog::new(
        ["a", "b", "c", "d"].into_iter().map(create_track).collect(),
    ))
}

/// Controllers: "dj"
pub fn policy() -> Arc<ConfiguredPolicy> {
    Arc::new(ConfiguredPolicy::new(["dj"], false))
}

pub fn spawn_room(provider: Arc<FakeProvider>) -> SessionHandle {
    SessionCoordinator::spawn(
        RoomId::new("test-room"),
        &SessionConfig::default(),
        provider,
        catalog(),
        policy(),
    )
}

/// Let background tasks run without moving far on the paused clock
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

/// Log output shared between the subscriber and the test
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Capture logs of the current thread until the guard is dropped
    ///
    /// Paused-clock tests run on a current-thread runtime, so spawned room
    /// tasks log through this subscriber too.
    pub fn install() -> (Self, DefaultGuard) {
        let capture = Self::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(BoxMakeWriter::new(move || writer.clone()))
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (capture, guard)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
