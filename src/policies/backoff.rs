//! # Backoff policy for delivery retries.
//!
//! [`BackoffPolicy`] controls how long the transport worker waits before
//! retrying an envelope after a transient send failure. It is parameterized by:
//! - [`BackoffPolicy::initial`] the delay before the first retry;
//! - [`BackoffPolicy::factor`] the multiplicative growth factor;
//! - [`BackoffPolicy::cap`] the maximum delay.
//!
//! The delay for attempt `n` is computed as `initial × factor^n`, clamped to
//! `cap`, then jitter is applied. The base delay is derived purely from the
//! attempt number, so jitter output never feeds back into later delays.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use faultline::{BackoffPolicy, JitterPolicy};
//!
//! let backoff = BackoffPolicy {
//!     initial: Duration::from_millis(100),
//!     cap: Duration::from_secs(10),
//!     factor: 2.0,
//!     jitter: JitterPolicy::None,
//! };
//!
//! assert_eq!(backoff.delay(0), Duration::from_millis(100));
//! assert_eq!(backoff.delay(1), Duration::from_millis(200));
//! // 100ms × 2^10 = 102_400ms, capped at 10s
//! assert_eq!(backoff.delay(10), Duration::from_secs(10));
//! ```

use std::time::Duration;

use crate::policies::jitter::JitterPolicy;

/// Retry backoff policy for the delivery worker.
#[derive(Clone, Copy, Debug)]
pub struct BackoffPolicy {
    /// Delay before the first retry.
    pub initial: Duration,
    /// Maximum delay between retries.
    pub cap: Duration,
    /// Multiplicative growth factor (`>= 1.0` recommended).
    pub factor: f64,
    /// Jitter applied to the computed delay.
    pub jitter: JitterPolicy,
}

impl Default for BackoffPolicy {
    /// Returns a policy with:
    /// - `initial = 500ms`;
    /// - `factor = 2.0` (exponential);
    /// - `cap = 30s`;
    /// - `jitter = Equal`.
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(500),
            cap: Duration::from_secs(30),
            factor: 2.0,
            jitter: JitterPolicy::Equal,
        }
    }
}

impl BackoffPolicy {
    /// Computes the delay for the given retry attempt (0-indexed).
    ///
    /// The base delay is `initial × factor^attempt`, clamped to
    /// [`BackoffPolicy::cap`], with jitter applied afterwards.
    ///
    /// # Notes
    /// - `factor == 1.0` keeps the delay constant at `initial` (up to `cap`).
    /// - Overflowing or non-finite intermediate values clamp to `cap`.
    pub fn delay(&self, attempt: u32) -> Duration {
        let cap_secs = self.cap.as_secs_f64();
        let exp = attempt.min(i32::MAX as u32) as i32;
        let raw_secs = self.initial.as_secs_f64() * self.factor.powi(exp);

        let base = if !raw_secs.is_finite() || raw_secs < 0.0 || raw_secs > cap_secs {
            self.cap
        } else {
            Duration::from_secs_f64(raw_secs)
        };

        self.jitter.apply(base)
    }
}
