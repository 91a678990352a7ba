//! Soundroom - Sync Layer
//!
//! Network resilience for a room:
//! - `BackoffScheduler`: capped exponential retry (`min(N², 30)` seconds) with
//!   slow-connection detection, cancellable at any point
//! - `SyncDistributor`: replay-then-push snapshot delivery with independent
//!   per-observer retry
//!
//! Both only read session state. Mutations go back through the session's
//! command channel.

mod backoff;
mod distributor;
mod error;
mod observer;

pub use backoff::{
    BackoffPolicy, BackoffScheduler, RetryContext, RetryStep, Timer, TokioTimer,
    MAX_RETRY_INTERVAL_SECS, SLOW_CONNECTION_RETRIES,
};
pub use distributor::{ObserverRegistration, SyncDistributor};
pub use error::{DeliveryError, RetryAbort};
pub use observer::SnapshotObserver;
