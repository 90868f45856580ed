//! Tower middleware that puts a [`RateLimitPolicy`] in front of a service.

use crate::{CancelToken, ExecutionResult, GateError, RateLimitPolicy};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tower_layer::Layer;
use tower_service::Service;

/// A layer that gates requests through a [`RateLimitPolicy`].
#[derive(Clone, Debug)]
pub struct RateLimitLayer {
    policy: RateLimitPolicy,
    cancel: CancelToken,
}

impl RateLimitLayer {
    /// Create a new rate limit layer.
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self { policy, cancel: CancelToken::new() }
    }

    /// Observe `cancel` while requests wait for permits, e.g. a shutdown
    /// signal shared across the stack.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimitService<S>;

    fn layer(&self, service: S) -> Self::Service {
        RateLimitService {
            inner: service,
            policy: self.policy.clone(),
            cancel: self.cancel.clone(),
        }
    }
}

/// Middleware service that acquires a permit before each call.
#[derive(Clone, Debug)]
pub struct RateLimitService<S> {
    inner: S,
    policy: RateLimitPolicy,
    cancel: CancelToken,
}

impl<S, Req> Service<Req> for RateLimitService<S>
where
    S: Service<Req> + Clone + Send + 'static,
    S::Response: Send + 'static,
    S::Future: Send + 'static,
    S::Error: std::error::Error + Send + Sync + 'static,
    Req: Send + 'static,
{
    type Response = S::Response;
    type Error = GateError<S::Error>;
    // Use BoxFuture for now; can optimize to pin-project later if needed.
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(GateError::Inner)
    }

    fn call(&mut self, req: Req) -> Self::Future {
        let policy = self.policy.clone();
        let cancel = self.cancel.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            match policy.pre_execute::<S::Response, S::Error>(&cancel).await {
                ExecutionResult::NoResult => inner.call(req).await.map_err(GateError::Inner),
                ExecutionResult::Failure(e) => Err(e),
                ExecutionResult::Success(v) => Ok(v),
            }
        })
    }
}
