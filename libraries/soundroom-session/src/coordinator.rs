//! Per-room session coordinator
//!
//! One task per room owns the queue and the playback state machine. Every
//! mutation reaches it as a message, so votes, track-end advancement and
//! transport commands never interleave:
//! - observer commands from [`SessionHandle`]
//! - provider end-of-track events
//! - progress sampling ticks
//! - results from the login and advance retry tasks
//!
//! After each mutation the coordinator rebuilds the snapshot from scratch and
//! hands it to the room's [`SyncDistributor`].

use crate::{
    command::{InternalEvent, Reply, SessionCommand},
    config::SessionConfig,
    error::{Result, SessionError},
    handle::SessionHandle,
};
use soundroom_core::{
    AccessPolicy, Catalog, EntryId, PlaybackSnapshot, PlaybackStatus, QueueEntry, RoomId,
    Transient, VoterId,
};
use soundroom_playback::{
    EndReason, PlaybackError, PlaybackEvent, PlaybackProvider, PlaybackStateMachine,
    ProviderEvent, QueueError, QueueManager,
};
use soundroom_sync::{BackoffScheduler, RetryAbort, SyncDistributor};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Entry taken off the queue that could not be started yet
struct PendingAdvance {
    entry: QueueEntry,

    /// Cancels the background retry for this entry, if one runs
    cancel: CancellationToken,
}

/// Authoritative state of one room
pub struct SessionCoordinator {
    room: RoomId,
    queue: QueueManager,
    machine: PlaybackStateMachine,
    policy: Arc<dyn AccessPolicy>,
    distributor: SyncDistributor,
    scheduler: BackoffScheduler,

    commands: mpsc::Receiver<SessionCommand>,
    internal_tx: mpsc::Sender<InternalEvent>,
    internal_rx: mpsc::Receiver<InternalEvent>,
    provider_events: Option<broadcast::Receiver<ProviderEvent>>,

    /// Progress sampling timer, running only while playing
    sampler: Option<Interval>,
    pending: Option<PendingAdvance>,
    shutdown: CancellationToken,
}

impl SessionCoordinator {
    /// Start a room and return the handle observers use to reach it
    ///
    /// Provider login starts immediately in the background and is retried
    /// with backoff. Until it succeeds the room accepts queue commands but
    /// cannot play.
    pub fn spawn(
        room: RoomId,
        config: &SessionConfig,
        provider: Arc<dyn PlaybackProvider>,
        catalog: Arc<dyn Catalog>,
        policy: Arc<dyn AccessPolicy>,
    ) -> SessionHandle {
        let shutdown = CancellationToken::new();
        let scheduler = BackoffScheduler::new(config.backoff.clone());
        let distributor = SyncDistributor::new(scheduler.clone(), shutdown.child_token());
        let (command_tx, commands) = mpsc::channel(config.command_channel_depth.max(1));
        let (internal_tx, internal_rx) = mpsc::channel(8);

        let coordinator = Self {
            room: room.clone(),
            queue: QueueManager::new(),
            provider_events: Some(provider.subscribe()),
            machine: PlaybackStateMachine::new(provider, config.machine.clone()),
            policy,
            distributor: distributor.clone(),
            scheduler,
            commands,
            internal_tx,
            internal_rx,
            sampler: None,
            pending: None,
            shutdown: shutdown.clone(),
        };

        coordinator.publish();
        coordinator.spawn_login();
        tokio::spawn(coordinator.run());

        SessionHandle::new(
            room,
            command_tx,
            distributor,
            catalog,
            config.catalog_timeout(),
            shutdown,
        )
    }

    async fn run(mut self) {
        info!(
            room = %self.room,
            provider = self.machine.provider().name(),
            "session started"
        );

        loop {
            tokio::select! {
                biased;
                () = self.shutdown.cancelled() => break,
                Some(event) = self.internal_rx.recv() => self.handle_internal(event).await,
                command = self.commands.recv() => match command {
                    Some(command) => self.handle_command(command).await,
                    None => break,
                },
                event = next_provider_event(&mut self.provider_events) => {
                    self.handle_provider_event(event).await;
                }
                () = next_tick(&mut self.sampler) => self.sample().await,
            }
        }

        // Stops login and advance retries and every observer delivery
        self.shutdown.cancel();
        info!(room = %self.room, "session closed");
    }

    // ===== Commands =====

    async fn handle_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Enqueue { track, user, reply } => {
                let entry = self.queue.enqueue(track, user);
                debug!(room = %self.room, entry = %entry.id, track = %entry.track.id, "entry queued");

                if self.machine.status() == PlaybackStatus::Idle
                    && self.pending.is_none()
                    && self.machine.is_provider_ready()
                {
                    self.advance().await;
                }
                self.publish();
                let _ = reply.send(Ok(entry));
            }
            SessionCommand::Vote { entry, user, reply } => {
                let result = self.queue.add_vote(entry, user).map_err(SessionError::from);
                self.publish_and_reply(reply, result);
            }
            SessionCommand::Unvote { entry, user, reply } => {
                let result = self
                    .queue
                    .remove_vote(entry, &user)
                    .map_err(SessionError::from);
                self.publish_and_reply(reply, result);
            }
            SessionCommand::RemoveEntry { entry, user, reply } => {
                let result = self.remove_entry(entry, &user);
                self.publish_and_reply(reply, result);
            }
            SessionCommand::Pause { user, reply } => {
                let result = self.pause(&user).await;
                self.publish_and_reply(reply, result);
            }
            SessionCommand::Resume { user, reply } => {
                let result = self.resume(&user).await;
                self.publish_and_reply(reply, result);
            }
            SessionCommand::Seek {
                user,
                seconds,
                reply,
            } => {
                let result = self.seek(&user, seconds).await;
                self.publish_and_reply(reply, result);
            }
            SessionCommand::Snapshot { reply } => {
                let _ = reply.send(Ok(self.snapshot()));
            }
        }
    }

    fn publish_and_reply<T>(&self, reply: Reply<T>, result: Result<T>) {
        if result.is_ok() {
            self.publish();
        }
        let _ = reply.send(result);
    }

    fn remove_entry(&mut self, entry_id: EntryId, user: &VoterId) -> Result<QueueEntry> {
        let entry = self
            .queue
            .get(entry_id)
            .ok_or(QueueError::NotFound(entry_id))?;
        if !self.policy.can_remove_track(entry, user) {
            debug!(room = %self.room, entry = %entry_id, user = %user, "remove denied");
            return Err(SessionError::Forbidden);
        }
        Ok(self.queue.remove_entry(entry_id)?)
    }

    async fn pause(&mut self, user: &VoterId) -> Result<()> {
        self.authorize_control(user)?;
        self.machine.pause().await?;
        self.sampler = None;
        Ok(())
    }

    async fn resume(&mut self, user: &VoterId) -> Result<()> {
        self.authorize_control(user)?;
        let was_paused = self.machine.status() == PlaybackStatus::Paused;
        self.machine.resume().await?;
        if was_paused {
            self.start_sampling();
        }
        Ok(())
    }

    async fn seek(&mut self, user: &VoterId, seconds: f64) -> Result<f64> {
        self.authorize_control(user)?;
        Ok(self.machine.seek(seconds).await?)
    }

    fn authorize_control(&self, user: &VoterId) -> Result<()> {
        if self.policy.can_control_playback(user) {
            Ok(())
        } else {
            debug!(room = %self.room, user = %user, "transport command denied");
            Err(SessionError::Forbidden)
        }
    }

    // ===== Playback Events =====

    async fn handle_provider_event(&mut self, event: ProviderEvent) {
        match event {
            ProviderEvent::EndOfTrack { track_uri } => {
                if let Some(PlaybackEvent::TrackEnded { entry_id, reason }) =
                    self.machine.on_provider_end(&track_uri)
                {
                    self.on_track_ended(entry_id, reason).await;
                }
            }
        }
    }

    async fn sample(&mut self) {
        match self.machine.sample().await {
            Some(PlaybackEvent::TrackEnded { entry_id, reason }) => {
                self.on_track_ended(entry_id, reason).await;
            }
            Some(PlaybackEvent::Progress { .. }) => self.publish(),
            None => self.sampler = None,
        }
    }

    async fn on_track_ended(&mut self, entry_id: EntryId, reason: EndReason) {
        info!(room = %self.room, entry = %entry_id, ?reason, "track ended");
        self.machine.finish();
        self.sampler = None;
        self.advance().await;
        self.publish();
    }

    // ===== Advancement =====

    /// Start the pending entry if there is one, otherwise the queue head
    async fn advance(&mut self) {
        let entry = if let Some(pending) = self.pending.take() {
            pending.cancel.cancel();
            pending.entry
        } else if let Some(entry) = self.queue.pop_next() {
            entry
        } else {
            debug!(room = %self.room, "queue empty, staying idle");
            return;
        };

        self.start(entry).await;
    }

    async fn start(&mut self, entry: QueueEntry) {
        match self.machine.load_and_play(&entry).await {
            Ok(()) => self.on_started(&entry),
            Err(err) if err.is_transient() => {
                let cancel = self.shutdown.child_token();
                self.spawn_advance_retry(err, cancel.clone());
                self.pending = Some(PendingAdvance { entry, cancel });
            }
            Err(err) => self.hold_until_login(entry, &err),
        }
    }

    /// Park `entry` after a permanent start failure
    ///
    /// A provider that was logged in has dropped the session or rejected us,
    /// so login starts again; the entry plays once `ProviderReady` arrives.
    fn hold_until_login(&mut self, entry: QueueEntry, err: &PlaybackError) {
        warn!(
            room = %self.room,
            entry = %entry.id,
            error = %err,
            "cannot start entry, holding it until the provider is ready"
        );
        if self.machine.is_provider_ready() {
            self.machine.set_provider_ready(false);
            self.spawn_login();
        }
        self.pending = Some(PendingAdvance {
            entry,
            cancel: CancellationToken::new(),
        });
    }

    fn on_started(&mut self, entry: &QueueEntry) {
        info!(room = %self.room, entry = %entry.id, track = %entry.track.id, "now playing");
        self.start_sampling();
    }

    /// Load the pending entry on behalf of the advance retry task
    async fn retry_pending(&mut self) -> std::result::Result<(), PlaybackError> {
        // Superseded: nothing left to retry
        let Some(pending) = self.pending.take() else {
            return Ok(());
        };

        match self.machine.load_and_play(&pending.entry).await {
            Ok(()) => {
                self.on_started(&pending.entry);
                self.publish();
                Ok(())
            }
            Err(err) if err.is_transient() => {
                self.pending = Some(pending);
                Err(err)
            }
            Err(err) => {
                // Ends the retry task; login takes over from here
                self.hold_until_login(pending.entry, &err);
                self.publish();
                Err(err)
            }
        }
    }

    async fn handle_internal(&mut self, event: InternalEvent) {
        match event {
            InternalEvent::ProviderReady => {
                info!(room = %self.room, "provider logged in");
                self.machine.set_provider_ready(true);
                if self.machine.status() == PlaybackStatus::Idle {
                    self.advance().await;
                }
                self.publish();
            }
            InternalEvent::RetryAdvance { reply } => {
                let result = self.retry_pending().await;
                let _ = reply.send(result);
            }
        }
    }

    // ===== Background Tasks =====

    fn spawn_login(&self) {
        let provider = Arc::clone(self.machine.provider());
        let scheduler = self.scheduler.clone();
        let cancel = self.shutdown.child_token();
        let events = self.internal_tx.clone();
        let room = self.room.clone();

        tokio::spawn(async move {
            let result = scheduler
                .retry(
                    "provider_login",
                    &cancel,
                    |_| {},
                    || {
                        let provider = Arc::clone(&provider);
                        async move { provider.login().await }
                    },
                )
                .await;

            match result {
                Ok(()) => {
                    let _ = events.send(InternalEvent::ProviderReady).await;
                }
                Err(RetryAbort::Permanent(err)) => {
                    error!(room = %room, provider = provider.name(), error = %err, "provider login failed");
                }
                Err(RetryAbort::Cancelled) => debug!(room = %room, "provider login cancelled"),
            }
        });
    }

    fn spawn_advance_retry(&self, failure: PlaybackError, cancel: CancellationToken) {
        let scheduler = self.scheduler.clone();
        let internal = self.internal_tx.clone();
        let room = self.room.clone();

        tokio::spawn(async move {
            let result = scheduler
                .retry_after_failure("advance", &cancel, |_| {}, failure, || {
                    let internal = internal.clone();
                    async move {
                        let (reply, response) = oneshot::channel();
                        internal
                            .send(InternalEvent::RetryAdvance { reply })
                            .await
                            .map_err(|_| PlaybackError::ProviderUnavailable)?;
                        response
                            .await
                            .unwrap_or(Err(PlaybackError::ProviderUnavailable))
                    }
                })
                .await;

            if let Err(RetryAbort::Permanent(err)) = result {
                debug!(room = %room, error = %err, "advance retry stopped");
            }
        });
    }

    fn start_sampling(&mut self) {
        let settings = self.machine.settings();
        let mut interval = interval_at(
            Instant::now() + settings.first_sample_delay(),
            settings.sample_interval(),
        );
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.sampler = Some(interval);
    }

    // ===== Snapshot =====

    fn snapshot(&self) -> PlaybackSnapshot {
        let current_entry = self
            .machine
            .current()
            .or_else(|| self.pending.as_ref().map(|p| &p.entry))
            .cloned();
        let duration_seconds = current_entry
            .as_ref()
            .map_or(0.0, |entry| entry.track.duration_seconds());

        PlaybackSnapshot {
            room: self.room.clone(),
            status: self.machine.status(),
            current_entry,
            elapsed_seconds: self.machine.elapsed_seconds(),
            duration_seconds,
            queue: self.queue.entries().to_vec(),
        }
    }

    fn publish(&self) {
        self.distributor.publish(self.snapshot());
    }
}

async fn next_provider_event(
    events: &mut Option<broadcast::Receiver<ProviderEvent>>,
) -> ProviderEvent {
    loop {
        let Some(receiver) = events.as_mut() else {
            return std::future::pending().await;
        };
        match receiver.recv().await {
            Ok(event) => return event,
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "provider events lagged"),
            Err(RecvError::Closed) => *events = None,
        }
    }
}

async fn next_tick(sampler: &mut Option<Interval>) {
    match sampler {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
