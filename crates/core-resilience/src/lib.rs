//! Simlink Core Resilience: Pure-logic retry discipline
//!
//! # Overview
//!
//! Every remote call issued against the simulator is wrapped in a
//! [`RetryPolicy`]. A call that fails with a *recoverable* error (a decoded
//! remote status or a transport-level connection problem) is logged and
//! re-issued immediately with the same arguments. Any other failure is
//! handed back to the caller untouched.
//!
//! This crate is **pure logic** with zero knowledge of:
//! - The remote protocol or its status codes
//! - Sockets or sessions
//!
//! The caller decides what counts as recoverable by implementing
//! [`Recoverable`] for its error type.
//!
//! ```text
//!            ┌──────────────┐   recoverable error (log, re-issue)
//!  call ───▶ │  ATTEMPTING  │ ───────────────────────────┐
//!            └──────┬───────┘ ◀──────────────────────────┘
//!                   │ Ok / fatal error
//!                   ▼
//!            ┌──────────────┐
//!            │     DONE     │
//!            └──────────────┘
//! ```
//!
//! # Usage Example
//!
//! ```
//! use simlink_core_resilience::{execute, Recoverable};
//! use std::fmt;
//!
//! #[derive(Debug)]
//! struct Flaky;
//!
//! impl fmt::Display for Flaky {
//!     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
//!         write!(f, "flaky link")
//!     }
//! }
//!
//! impl Recoverable for Flaky {
//!     fn is_recoverable(&self) -> bool {
//!         true
//!     }
//! }
//!
//! let mut remaining = 2;
//! let value = execute("get_answer", || {
//!     if remaining > 0 {
//!         remaining -= 1;
//!         Err(Flaky)
//!     } else {
//!         Ok(42)
//!     }
//! });
//! assert_eq!(value.unwrap(), 42);
//! ```

pub mod retry;

pub use retry::{execute, Recoverable, RetryPolicy};
