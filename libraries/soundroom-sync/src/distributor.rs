//! Snapshot fan-out with replay-on-connect
//!
//! The latest snapshot lives in a `watch` channel. Each observer gets its own
//! delivery task that:
//! 1. replays the current snapshot as soon as one exists
//! 2. pushes every later change
//! 3. retries failed pushes through the backoff scheduler, re-reading the
//!    latest snapshot on each attempt so a retry never delivers stale state
//!
//! Tasks are independent: a slow or failing observer never delays the others.

use crate::{
    backoff::BackoffScheduler,
    error::RetryAbort,
    observer::SnapshotObserver,
};
use soundroom_core::{ObserverId, PlaybackSnapshot};
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

type Latest = Option<Arc<PlaybackSnapshot>>;

/// Distributes a room's snapshots to its observers
#[derive(Clone)]
pub struct SyncDistributor {
    latest: Arc<watch::Sender<Latest>>,
    scheduler: BackoffScheduler,
    shutdown: CancellationToken,
}

impl SyncDistributor {
    /// Create a distributor whose delivery tasks stop when `shutdown` fires
    pub fn new(scheduler: BackoffScheduler, shutdown: CancellationToken) -> Self {
        let (latest, _) = watch::channel(None);
        Self {
            latest: Arc::new(latest),
            scheduler,
            shutdown,
        }
    }

    /// Replace the current snapshot and wake every delivery task
    pub fn publish(&self, snapshot: PlaybackSnapshot) {
        self.latest.send_replace(Some(Arc::new(snapshot)));
    }

    /// Current snapshot, if one was published
    pub fn latest(&self) -> Option<Arc<PlaybackSnapshot>> {
        self.latest.borrow().clone()
    }

    /// Number of live delivery tasks
    pub fn observer_count(&self) -> usize {
        self.latest.receiver_count()
    }

    /// Start delivering to `observer`
    ///
    /// The observer receives the current snapshot first, then every change.
    /// Delivery stops when the returned registration is disconnected or
    /// dropped, when the observer reports `Disconnected`, or on shutdown.
    pub fn connect(&self, observer: Arc<dyn SnapshotObserver>) -> ObserverRegistration {
        let cancel = self.shutdown.child_token();
        let mut receiver = self.latest.subscribe();
        receiver.mark_changed();

        let id = observer.id();
        info!(observer = %id, "observer connected");
        tokio::spawn(deliver_loop(
            observer,
            receiver,
            self.scheduler.clone(),
            cancel.clone(),
        ));

        ObserverRegistration { id, cancel }
    }

    /// Stop every delivery task
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

/// Handle to one observer's delivery task
#[must_use = "dropping the registration disconnects the observer"]
#[derive(Debug)]
pub struct ObserverRegistration {
    id: ObserverId,
    cancel: CancellationToken,
}

impl ObserverRegistration {
    pub fn id(&self) -> ObserverId {
        self.id
    }

    /// Stop delivery, including any pending retry
    pub fn disconnect(&self) {
        self.cancel.cancel();
    }

    pub fn is_connected(&self) -> bool {
        !self.cancel.is_cancelled()
    }
}

impl Drop for ObserverRegistration {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn deliver_loop(
    observer: Arc<dyn SnapshotObserver>,
    mut receiver: watch::Receiver<Latest>,
    scheduler: BackoffScheduler,
    cancel: CancellationToken,
) {
    let id = observer.id();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            changed = receiver.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }

        // Nothing published yet: wait for the first real snapshot
        if receiver.borrow_and_update().is_none() {
            continue;
        }

        let result = scheduler
            .retry(
                "deliver_snapshot",
                &cancel,
                |slow| observer.on_slow_connection(slow),
                || {
                    let snapshot = receiver.borrow_and_update().clone();
                    let observer = Arc::clone(&observer);
                    async move {
                        match snapshot {
                            Some(snapshot) => observer.deliver(&snapshot).await,
                            None => Ok(()),
                        }
                    }
                },
            )
            .await;

        match result {
            Ok(()) => {}
            Err(RetryAbort::Cancelled) => break,
            Err(RetryAbort::Permanent(err)) => {
                debug!(observer = %id, error = %err, "stopping delivery");
                break;
            }
        }
    }

    debug!(observer = %id, "observer delivery ended");
}
