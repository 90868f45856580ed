//! Permit source capability
//!
//! The gate never sees bucket or window math; it consumes an abstract
//! capability with exactly two acquisition shapes. Fairness across concurrent
//! waiters is the implementor's contract, not the gate's.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Capability exposed by a rate limiter: hand out permits, one per operation
/// attempt.
///
/// Contract for implementors:
/// - `try_acquire` never suspends.
/// - `try_acquire_within` resolves `true` as soon as a permit is granted and
///   `false` once the window elapses; a `false` return must not have consumed
///   a permit.
/// - Both must be safe under concurrent invocation.
#[async_trait]
pub trait PermitSource: Send + Sync {
    /// Attempt to take one permit without waiting.
    async fn try_acquire(&self) -> bool;

    /// Wait up to `timeout` for one permit.
    async fn try_acquire_within(&self, timeout: Duration) -> bool;
}

/// Permit source backed by a [`tokio::sync::Semaphore`].
///
/// Permits are consumed, not returned: an admitted operation does not give its
/// permit back on completion. Replenishment comes from outside via
/// [`add_permits`], typically a refill task owned by whatever limiter
/// algorithm sits above this source.
///
/// [`add_permits`]: SemaphorePermits::add_permits
#[derive(Debug, Clone)]
pub struct SemaphorePermits {
    semaphore: Arc<Semaphore>,
}

impl SemaphorePermits {
    /// Create a source holding `permits` initial permits.
    pub fn new(permits: usize) -> Self {
        Self { semaphore: Arc::new(Semaphore::new(permits)) }
    }

    /// Make `n` more permits available, waking pending bounded waits.
    pub fn add_permits(&self, n: usize) {
        self.semaphore.add_permits(n);
    }

    /// Number of permits currently available.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

#[async_trait]
impl PermitSource for SemaphorePermits {
    async fn try_acquire(&self) -> bool {
        match self.semaphore.try_acquire() {
            Ok(permit) => {
                permit.forget();
                true
            }
            Err(_) => false,
        }
    }

    async fn try_acquire_within(&self, timeout: Duration) -> bool {
        match tokio::time::timeout(timeout, self.semaphore.acquire()).await {
            Ok(Ok(permit)) => {
                permit.forget();
                true
            }
            // Semaphore closed; nothing will ever be granted.
            Ok(Err(_)) => false,
            // Window elapsed.
            Err(_) => false,
        }
    }
}

/// Deterministic permit source for tests: grants exactly `n` permits and never
/// waits, so bounded and unbounded acquisition behave identically.
///
/// Serves the same role as a tracking test double shipped in the crate proper:
/// callers can assert exact permit consumption against it.
#[derive(Debug, Clone)]
pub struct FixedPermits {
    remaining: Arc<AtomicUsize>,
}

impl FixedPermits {
    /// Create a source that will grant exactly `n` permits.
    pub fn new(n: usize) -> Self {
        Self { remaining: Arc::new(AtomicUsize::new(n)) }
    }

    /// Permits not yet handed out.
    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::SeqCst)
    }

    fn take_one(&self) -> bool {
        self.remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl PermitSource for FixedPermits {
    async fn try_acquire(&self) -> bool {
        self.take_one()
    }

    async fn try_acquire_within(&self, _timeout: Duration) -> bool {
        self.take_one()
    }
}
