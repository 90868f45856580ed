//! Explicit cancellation token for bounded permit waits
//!
//! Replaces ambient per-thread interrupt state with a value the caller hands
//! to the gate. The token is level-triggered: once cancelled it stays
//! cancelled, so logic that observes cancellation never hides it from outer
//! cancellation-aware code.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Shared cancellation flag with async wakeup.
///
/// Clones share state: cancelling any clone cancels them all.
#[derive(Debug, Clone)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelToken {
    /// Create a token in the not-cancelled state.
    pub fn new() -> Self {
        Self { inner: Arc::new(Inner { cancelled: AtomicBool::new(false), notify: Notify::new() }) }
    }

    /// Cancel the token. Idempotent; wakes every pending [`cancelled`] wait.
    ///
    /// [`cancelled`]: CancelToken::cancelled
    pub fn cancel(&self) {
        if !self.inner.cancelled.swap(true, Ordering::AcqRel) {
            self.inner.notify.notify_waiters();
        }
    }

    /// Check the cancellation state without waiting.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Wait until the token is cancelled. Resolves immediately if it already
    /// is.
    pub async fn cancelled(&self) {
        loop {
            if self.is_cancelled() {
                return;
            }
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            // Register before the re-check so a cancel() landing between the
            // check and the await still wakes us.
            if notified.as_mut().enable() {
                return;
            }
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn starts_not_cancelled() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
    }

    #[tokio::test]
    async fn cancel_sets_state_and_stays_set() {
        let token = CancelToken::new();
        token.cancel();
        assert!(token.is_cancelled());
        token.cancel(); // idempotent
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let token = CancelToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn cancelled_resolves_immediately_when_already_set() {
        let token = CancelToken::new();
        token.cancel();
        // Must not hang.
        tokio::time::timeout(Duration::from_millis(100), token.cancelled())
            .await
            .expect("already-cancelled token should resolve immediately");
    }

    #[tokio::test]
    async fn cancelled_wakes_pending_waiter() {
        let token = CancelToken::new();
        let waiter = token.clone();
        let handle = tokio::spawn(async move {
            waiter.cancelled().await;
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        token.cancel();
        tokio::time::timeout(Duration::from_millis(500), handle)
            .await
            .expect("waiter should wake after cancel")
            .expect("waiter task should not panic");
    }

    #[tokio::test]
    async fn cancelled_wakes_multiple_waiters() {
        let token = CancelToken::new();
        let mut handles = Vec::new();
        for _ in 0..4 {
            let waiter = token.clone();
            handles.push(tokio::spawn(async move {
                waiter.cancelled().await;
            }));
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
        token.cancel();
        for handle in handles {
            tokio::time::timeout(Duration::from_millis(500), handle)
                .await
                .expect("every waiter should wake")
                .expect("waiter task should not panic");
        }
    }
}
