//! Error types produced by the rate limit gate
use std::fmt;
use std::time::Duration;

/// Unified error type for gate-controlled executions.
///
/// The discriminant is closed on purpose: downstream classification matches on
/// the variant rather than inspecting error types at runtime, so a denied
/// permit can never be confused with a cancelled wait or an operation failure.
#[derive(Debug, Clone)]
pub enum GateError<E> {
    /// No permit became available within the gate's constraints.
    RateLimitExceeded {
        /// Diagnostic label of the limiter that denied the permit.
        limiter: String,
        /// The acquire timeout in effect, if one was configured.
        timeout: Option<Duration>,
    },
    /// The permit wait was cancelled before a permit was granted.
    Interrupted,
    /// The wrapped operation itself failed.
    Inner(E),
}

impl<E: fmt::Display> fmt::Display for GateError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimitExceeded { limiter, timeout: Some(t) } => {
                write!(f, "rate limit exceeded for '{}' (waited up to {:?})", limiter, t)
            }
            Self::RateLimitExceeded { limiter, timeout: None } => {
                write!(f, "rate limit exceeded for '{}'", limiter)
            }
            Self::Interrupted => write!(f, "permit wait interrupted by cancellation"),
            Self::Inner(e) => write!(f, "{}", e),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for GateError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Inner(e) => Some(e),
            _ => None,
        }
    }
}

impl<E> GateError<E> {
    /// Check if this error is a permit denial.
    pub fn is_rate_limit_exceeded(&self) -> bool {
        matches!(self, Self::RateLimitExceeded { .. })
    }
    /// Check if this error is a cancelled permit wait.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted)
    }
    /// Check if this error wraps an operation error.
    pub fn is_inner(&self) -> bool {
        matches!(self, Self::Inner(_))
    }
    /// Get the inner error if this is an Inner variant
    pub fn into_inner(self) -> Option<E> {
        match self {
            Self::Inner(e) => Some(e),
            _ => None,
        }
    }
    /// Borrow the inner error if present.
    pub fn as_inner(&self) -> Option<&E> {
        match self {
            Self::Inner(e) => Some(e),
            _ => None,
        }
    }
    /// Mutably borrow the inner error if present.
    pub fn as_inner_mut(&mut self) -> Option<&mut E> {
        match self {
            Self::Inner(e) => Some(e),
            _ => None,
        }
    }
    /// Access denial details as (limiter label, configured timeout).
    pub fn rate_limit_details(&self) -> Option<(&str, Option<Duration>)> {
        match self {
            Self::RateLimitExceeded { limiter, timeout } => Some((limiter.as_str(), *timeout)),
            _ => None,
        }
    }
}
