//! Rate limit gate
//!
//! The gate sits at the pre-execution hook of a policy pipeline and decides,
//! once per operation attempt, whether execution may proceed.
//!
//! Semantics:
//! - No acquire timeout configured: the check is non-blocking and asks the
//!   [`PermitSource`] for an immediate permit.
//! - Acquire timeout configured: the check waits up to that duration, racing
//!   the bounded acquisition against the caller's [`CancelToken`].
//! - Permit granted: the check returns the proceed-signal
//!   ([`ExecutionResult::NoResult`]) and exactly one permit was consumed.
//! - Permit denied or window elapsed: a [`GateError::RateLimitExceeded`]
//!   failure; nothing was consumed. Elapsed window and hard denial are
//!   deliberately indistinguishable.
//! - Cancelled while waiting: a [`GateError::Interrupted`] failure. The token
//!   is level-triggered, so the caller's cancellation machinery still observes
//!   the signal afterward; the gate never swallows it.
//!
//! Invariants:
//! - The check never panics and never propagates cancellation as anything but
//!   a classified result.
//! - [`is_failure`] is true for exactly the denials this gate manufactures,
//!   never for interruption or for errors of the wrapped operation.
//! - The gate keeps no state between invocations; all permit accounting lives
//!   in the [`PermitSource`], so one gate may serve concurrent attempts.
//!
//! [`is_failure`]: RateLimitPolicy::is_failure
//!
//! Example
//! ```rust
//! use std::time::Duration;
//! use floodgate::{CancelToken, GateError, RateLimitPolicy, SemaphorePermits};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let gate = RateLimitPolicy::new(SemaphorePermits::new(10))
//!     .with_acquire_timeout(Duration::from_millis(250));
//!
//! let result: Result<&str, GateError<std::io::Error>> =
//!     gate.execute(|| async { Ok("ran") }).await;
//! assert_eq!(result.unwrap(), "ran");
//! # });
//! ```

use crate::{CancelToken, ExecutionResult, GateError, PermitSource};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Rate limiting policy: admission control ahead of an operation.
#[derive(Clone)]
pub struct RateLimitPolicy {
    source: Arc<dyn PermitSource>,
    acquire_timeout: Option<Duration>,
    name: String,
}

impl std::fmt::Debug for RateLimitPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimitPolicy")
            .field("name", &self.name)
            .field("acquire_timeout", &self.acquire_timeout)
            .field("source", &"<permit source>")
            .finish()
    }
}

impl RateLimitPolicy {
    /// Create a non-blocking gate over `source`.
    pub fn new(source: impl PermitSource + 'static) -> Self {
        Self { source: Arc::new(source), acquire_timeout: None, name: "rate_limiter".into() }
    }

    /// Wait up to `timeout` for a permit instead of failing immediately.
    /// Panics if the timeout is zero or `Duration::MAX`.
    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        assert!(
            timeout > Duration::ZERO && timeout < Duration::MAX,
            "acquire timeout must be non-zero and finite",
        );
        self.acquire_timeout = Some(timeout);
        self
    }

    /// Set the diagnostic label carried by denial errors.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Inspect the configured acquire timeout.
    pub fn acquire_timeout(&self) -> Option<Duration> {
        self.acquire_timeout
    }

    /// The gate's diagnostic label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Decide whether one operation attempt may proceed.
    ///
    /// Returns [`ExecutionResult::NoResult`] when a permit was acquired (the
    /// proceed-signal), otherwise a classified failure. Consumes exactly one
    /// permit on admission and zero on any failure path.
    pub async fn pre_execute<T, E>(&self, cancel: &CancelToken) -> ExecutionResult<T, E> {
        if cancel.is_cancelled() {
            tracing::debug!(limiter = %self.name, "skipping permit acquisition: already cancelled");
            return ExecutionResult::Failure(GateError::Interrupted);
        }

        let acquired = match self.acquire_timeout {
            None => self.source.try_acquire().await,
            Some(timeout) => {
                tokio::select! {
                    acquired = self.source.try_acquire_within(timeout) => acquired,
                    _ = cancel.cancelled() => {
                        tracing::debug!(limiter = %self.name, "permit wait cancelled");
                        return ExecutionResult::Failure(GateError::Interrupted);
                    }
                }
            }
        };

        if acquired {
            ExecutionResult::NoResult
        } else {
            tracing::debug!(
                limiter = %self.name,
                timeout = ?self.acquire_timeout,
                "permit denied"
            );
            ExecutionResult::Failure(GateError::RateLimitExceeded {
                limiter: self.name.clone(),
                timeout: self.acquire_timeout,
            })
        }
    }

    /// True iff `result` is a denial manufactured by this policy kind.
    ///
    /// Interruption, operation errors, successes, and the proceed-signal all
    /// classify false, so the pipeline never mis-attributes them to the rate
    /// limit.
    pub fn is_failure<T, E>(&self, result: &ExecutionResult<T, E>) -> bool {
        matches!(result.failure(), Some(GateError::RateLimitExceeded { .. }))
    }

    /// Execute an async operation behind the gate.
    pub async fn execute<T, E, Fut, Op>(&self, operation: Op) -> Result<T, GateError<E>>
    where
        T: Send,
        E: std::error::Error + Send + Sync + 'static,
        Fut: Future<Output = Result<T, GateError<E>>> + Send,
        Op: FnOnce() -> Fut + Send,
    {
        self.execute_with_cancel(&CancelToken::new(), operation).await
    }

    /// Execute an async operation behind the gate, observing `cancel` while
    /// waiting for a permit.
    pub async fn execute_with_cancel<T, E, Fut, Op>(
        &self,
        cancel: &CancelToken,
        operation: Op,
    ) -> Result<T, GateError<E>>
    where
        T: Send,
        E: std::error::Error + Send + Sync + 'static,
        Fut: Future<Output = Result<T, GateError<E>>> + Send,
        Op: FnOnce() -> Fut + Send,
    {
        match self.pre_execute(cancel).await {
            ExecutionResult::NoResult => operation().await,
            ExecutionResult::Failure(e) => Err(e),
            // pre_execute never produces a success, but stay total.
            ExecutionResult::Success(v) => Ok(v),
        }
    }
}
