//! Delivery policies.
//!
//! This module groups the knobs that control what the transport does when
//! a send fails and when its pending queue fills up.
//!
//! ## Contents
//! - [`BackoffPolicy`] how retry delays evolve (initial / factor / cap + jitter)
//! - [`JitterPolicy`]  randomization strategy to avoid synchronized retries
//! - [`OverflowPolicy`] which pending envelope to sacrifice when the queue is full
//!
//! ## Quick wiring
//! ```text
//! ClientOptions { retry_backoff: BackoffPolicy, overflow: OverflowPolicy, max_retries, .. }
//!      └─► transport::AsyncTransport uses:
//!           - overflow when enqueue() hits capacity
//!           - retry_backoff.delay(attempt) between transient send failures
//!           - max_retries to bound the retry loop
//! ```
//!
//! ## Defaults
//! - `BackoffPolicy::default()` -> initial=500ms, factor=2.0, cap=30s, jitter=Equal.
//! - `OverflowPolicy::DropOldest` (admit the most recent signal).

mod backoff;
mod jitter;
mod overflow;

pub use backoff::BackoffPolicy;
pub use jitter::JitterPolicy;
pub use overflow::OverflowPolicy;
