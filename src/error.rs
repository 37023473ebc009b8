//! Error types used by the capture client and the delivery transport.
//!
//! This module defines two main error enums:
//!
//! - [`ConfigError`] - errors raised while constructing a [`Client`](crate::Client);
//!   the only failures ever surfaced synchronously to the caller.
//! - [`DeliveryError`] - errors raised while sending envelopes to the collector;
//!   internal to the transport worker and never propagated to capture calls.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics,
//! and [`DeliveryError::is_retryable`] drives the bounded retry loop.

use thiserror::Error;

/// # Errors produced while building a client.
///
/// Client construction is the single hard-failure point of the crate:
/// everything after a successful [`Client::new`](crate::Client::new)
/// degrades by dropping events, never by raising.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The collector endpoint (DSN) could not be parsed.
    #[error("invalid DSN: {reason}")]
    InvalidDsn {
        /// What part of the DSN was malformed.
        reason: String,
    },

    /// The sampling rate is outside the valid `[0.0, 1.0]` range.
    #[error("sample rate {rate} outside [0.0, 1.0]")]
    InvalidSampleRate {
        /// The offending rate.
        rate: f64,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use faultline::ConfigError;
    ///
    /// let err = ConfigError::InvalidDsn { reason: "missing host".into() };
    /// assert_eq!(err.as_label(), "config_invalid_dsn");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::InvalidDsn { .. } => "config_invalid_dsn",
            ConfigError::InvalidSampleRate { .. } => "config_invalid_sample_rate",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ConfigError::InvalidDsn { reason } => format!("invalid DSN: {reason}"),
            ConfigError::InvalidSampleRate { rate } => {
                format!("sample rate out of range: {rate}")
            }
        }
    }
}

/// # Errors produced while delivering an envelope.
///
/// These classify send failures for the transport worker. `Transient`
/// failures are retried up to the configured bound; `Rejected` failures
/// are dropped immediately.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum DeliveryError {
    /// The send failed in a way that may succeed if retried
    /// (connection refused, timeout, collector overloaded).
    #[error("transient delivery failure: {reason}")]
    Transient {
        /// The underlying failure message.
        reason: String,
    },

    /// The collector rejected the envelope outright
    /// (malformed payload, authentication failure). Never retried.
    #[error("envelope rejected by collector (no retry): {reason}")]
    Rejected {
        /// The rejection message.
        reason: String,
    },
}

impl DeliveryError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use faultline::DeliveryError;
    ///
    /// let err = DeliveryError::Transient { reason: "connection refused".into() };
    /// assert_eq!(err.as_label(), "delivery_transient");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DeliveryError::Transient { .. } => "delivery_transient",
            DeliveryError::Rejected { .. } => "delivery_rejected",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            DeliveryError::Transient { reason } => format!("transient: {reason}"),
            DeliveryError::Rejected { reason } => format!("rejected: {reason}"),
        }
    }

    /// Indicates whether the failure is safe to retry.
    ///
    /// Returns `true` for [`DeliveryError::Transient`], `false` otherwise.
    ///
    /// # Example
    /// ```
    /// use faultline::DeliveryError;
    ///
    /// let transient = DeliveryError::Transient { reason: "timeout".into() };
    /// assert!(transient.is_retryable());
    ///
    /// let rejected = DeliveryError::Rejected { reason: "bad auth".into() };
    /// assert!(!rejected.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        matches!(self, DeliveryError::Transient { .. })
    }
}
