//! Capped exponential backoff
//!
//! Delay before retry N (N starting at 1) is `min(N², max_retry_interval)`
//! seconds, so the default policy waits 1, 4, 9, 16, 25, 30, 30, ... seconds.
//! The number of retries is never capped; only cancellation ends a loop.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use soundroom_core::Transient;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::RetryAbort;

/// Default cap on a single retry delay (seconds)
pub const MAX_RETRY_INTERVAL_SECS: u64 = 30;

/// Default number of retries before a connection counts as slow
pub const SLOW_CONNECTION_RETRIES: u32 = 2;

/// Backoff configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffPolicy {
    /// Cap on a single retry delay (seconds)
    pub max_retry_interval_secs: u64,

    /// Consecutive retries after which `slowConnection(true)` is raised
    pub slow_connection_retries: u32,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_retry_interval_secs: MAX_RETRY_INTERVAL_SECS,
            slow_connection_retries: SLOW_CONNECTION_RETRIES,
        }
    }
}

impl BackoffPolicy {
    /// Delay before retry `retry` (1-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        let n = u64::from(retry.max(1));
        Duration::from_secs(n.saturating_mul(n).min(self.max_retry_interval_secs))
    }
}

/// One step of a failing operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryStep {
    /// 1-based retry number about to be scheduled
    pub retry: u32,

    /// Delay before that retry
    pub delay: Duration,

    /// This failure crossed the slow-connection threshold
    pub slow_connection_raised: bool,
}

/// Bookkeeping for one retryable operation
///
/// Created when the operation starts and discarded on success or abandonment.
#[derive(Debug, Clone)]
pub struct RetryContext {
    policy: BackoffPolicy,
    attempt_count: u32,
    next_delay: Duration,
    slow_connection: bool,
}

impl RetryContext {
    pub fn new(policy: BackoffPolicy) -> Self {
        Self {
            policy,
            attempt_count: 0,
            next_delay: Duration::ZERO,
            slow_connection: false,
        }
    }

    /// Record a transient failure and schedule the next retry
    ///
    /// The slow-connection signal is raised once, on the failure seen after
    /// `slow_connection_retries` retries have already been scheduled.
    pub fn record_failure(&mut self) -> RetryStep {
        let raised =
            !self.slow_connection && self.attempt_count >= self.policy.slow_connection_retries;
        if raised {
            self.slow_connection = true;
        }

        self.attempt_count = self.attempt_count.saturating_add(1);
        self.next_delay = self.policy.delay_for(self.attempt_count);

        RetryStep {
            retry: self.attempt_count,
            delay: self.next_delay,
            slow_connection_raised: raised,
        }
    }

    /// Record success
    ///
    /// Returns `true` if the slow-connection signal was raised and must now
    /// be cleared.
    pub fn record_success(&mut self) -> bool {
        let cleared = self.slow_connection;
        self.attempt_count = 0;
        self.next_delay = Duration::ZERO;
        self.slow_connection = false;
        cleared
    }

    /// Retries scheduled so far
    pub fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    pub fn next_delay(&self) -> Duration {
        self.next_delay
    }

    pub fn slow_connection(&self) -> bool {
        self.slow_connection
    }
}

/// Sleep source for retry delays
///
/// Injectable so retry timing can be asserted without waiting.
#[async_trait]
pub trait Timer: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Timer backed by the tokio clock
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

#[async_trait]
impl Timer for TokioTimer {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Drives retryable operations with capped exponential backoff
#[derive(Clone)]
pub struct BackoffScheduler {
    policy: BackoffPolicy,
    timer: Arc<dyn Timer>,
}

impl BackoffScheduler {
    /// Scheduler sleeping on the tokio clock
    pub fn new(policy: BackoffPolicy) -> Self {
        Self::with_timer(policy, Arc::new(TokioTimer))
    }

    pub fn with_timer(policy: BackoffPolicy, timer: Arc<dyn Timer>) -> Self {
        Self { policy, timer }
    }

    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }

    /// Run `attempt` until it succeeds, fails permanently, or `cancel` fires
    ///
    /// `on_slow` receives `true` once the slow-connection threshold is crossed
    /// and `false` on the success that follows. Cancellation returns
    /// immediately, during an attempt or a delay, without further callbacks.
    pub async fn retry<T, E, F, Fut, S>(
        &self,
        operation: &str,
        cancel: &CancellationToken,
        on_slow: S,
        attempt: F,
    ) -> Result<T, RetryAbort<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Transient + Display,
        S: FnMut(bool),
    {
        self.drive(operation, cancel, on_slow, None, attempt).await
    }

    /// Like [`retry`](Self::retry), for an operation whose first attempt was
    /// already made by the caller and failed with `failure`
    ///
    /// The first delay is scheduled before `attempt` is called at all.
    pub async fn retry_after_failure<T, E, F, Fut, S>(
        &self,
        operation: &str,
        cancel: &CancellationToken,
        on_slow: S,
        failure: E,
        attempt: F,
    ) -> Result<T, RetryAbort<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Transient + Display,
        S: FnMut(bool),
    {
        self.drive(operation, cancel, on_slow, Some(failure), attempt)
            .await
    }

    async fn drive<T, E, F, Fut, S>(
        &self,
        operation: &str,
        cancel: &CancellationToken,
        mut on_slow: S,
        mut failed: Option<E>,
        mut attempt: F,
    ) -> Result<T, RetryAbort<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Transient + Display,
        S: FnMut(bool),
    {
        let mut context = RetryContext::new(self.policy.clone());

        loop {
            let err = match failed.take() {
                Some(err) => err,
                None => {
                    let outcome = tokio::select! {
                        biased;
                        () = cancel.cancelled() => return Err(RetryAbort::Cancelled),
                        outcome = attempt() => outcome,
                    };
                    match outcome {
                        Ok(value) => {
                            if context.record_success() {
                                info!(operation, "connection recovered");
                                on_slow(false);
                            }
                            return Ok(value);
                        }
                        Err(err) => err,
                    }
                }
            };

            if !err.is_transient() {
                return Err(RetryAbort::Permanent(err));
            }

            let step = context.record_failure();
            warn!(
                operation,
                retry = step.retry,
                delay_secs = step.delay.as_secs(),
                error = %err,
                "operation failed, retrying"
            );
            if step.slow_connection_raised {
                warn!(operation, retries = step.retry - 1, "slow connection detected");
                on_slow(true);
            }

            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(RetryAbort::Cancelled),
                () = self.timer.sleep(step.delay) => {}
            }
        }
    }
}
