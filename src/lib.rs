#![forbid(unsafe_code)]
#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::all))]

//! # Floodgate 🚪
//!
//! Rate-limit gate for async Rust pipelines: permit acquisition with bounded
//! waits, cancellation-aware denial, and failure classification.
//!
//! ## Features
//!
//! - **Permit source capability** decoupling the gate from token bucket,
//!   leaky bucket, or window accounting
//! - **Non-blocking or timeout-bounded acquisition** per gate instance
//! - **Explicit cancellation tokens** so interrupted waits stay observable
//! - **Closed failure taxonomy** distinguishing permit denial from
//!   cancellation and operation errors
//! - **Tower middleware** for dropping the gate in front of any service
//!
//! ## Quick Start
//!
//! ```rust
//! use floodgate::{GateError, RateLimitPolicy, SemaphorePermits};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let gate = RateLimitPolicy::new(SemaphorePermits::new(100))
//!         .with_acquire_timeout(Duration::from_millis(250))
//!         .named("payments-api");
//!
//!     let result = gate.execute(|| async {
//!         // Your async operation here
//!         Ok::<_, GateError<std::io::Error>>(())
//!     }).await;
//!     assert!(result.is_ok());
//! }
//! ```

pub mod cancel;
pub mod error;
pub mod gate;
pub mod middleware;
pub mod permit;
pub mod result;

// Re-exports
pub use cancel::CancelToken;
pub use error::GateError;
pub use gate::RateLimitPolicy;
pub use middleware::{RateLimitLayer, RateLimitService};
pub use permit::{FixedPermits, PermitSource, SemaphorePermits};
pub use result::ExecutionResult;
