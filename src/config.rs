//! # Client configuration.
//!
//! Provides [`ClientOptions`], the immutable configuration record a
//! [`Client`](crate::Client) is built from.
//!
//! Options are consumed once by `Client::new` (or [`init`](crate::init))
//! and never mutated afterwards; reconfiguring means building a new client
//! and re-binding it into the hub.
//!
//! ## Field semantics
//! - `dsn`: collector endpoint; parsing it is the only hard failure
//! - `sample_rate`: probabilistic keep rate in `[0.0, 1.0]` (`1.0` = keep all)
//! - `max_breadcrumbs`: per-scope ring capacity (oldest evicted on overflow)
//! - `attach_stacktrace`: capture a stacktrace for exception events
//! - `queue_capacity`: pending-envelope bound of the transport (min 1, clamped)
//! - `overflow`: which envelope to drop when the queue is full
//! - `max_retries`: transient-failure retries per envelope before dropping it
//! - `retry_backoff`: delay schedule between those retries
//! - `shutdown_timeout`: implicit flush deadline used by `close`
//! - `processors`: ordered event-processor pipeline (first drop wins)

use std::sync::Arc;
use std::time::Duration;

use crate::policies::{BackoffPolicy, OverflowPolicy};
use crate::processors::EventProcessor;

/// Default per-scope breadcrumb capacity.
pub const DEFAULT_MAX_BREADCRUMBS: usize = 100;

/// Configuration for building a [`Client`](crate::Client).
///
/// Start from [`ClientOptions::new`] with a DSN and adjust with the
/// `with_*` builders.
///
/// ## Example
/// ```rust
/// use faultline::{ClientOptions, OverflowPolicy};
///
/// let options = ClientOptions::new("https://key@collector.example.com/7")
///     .with_sample_rate(0.25)
///     .with_max_breadcrumbs(50)
///     .with_overflow(OverflowPolicy::DropNewest);
///
/// assert_eq!(options.sample_rate, 0.25);
/// ```
#[derive(Clone)]
pub struct ClientOptions {
    /// Collector endpoint, `scheme://public_key@host[:port]/project_id`.
    pub dsn: String,

    /// Probability that a captured event is kept.
    ///
    /// `1.0` keeps everything, `0.0` drops everything. Values outside
    /// `[0.0, 1.0]` fail client construction.
    pub sample_rate: f64,

    /// Breadcrumb ring capacity per scope.
    ///
    /// Appending beyond this evicts the oldest entry. `0` disables
    /// breadcrumb recording.
    pub max_breadcrumbs: usize,

    /// Capture a stacktrace when building exception events.
    pub attach_stacktrace: bool,

    /// Capacity of the transport's pending queue (clamped to a minimum of 1).
    pub queue_capacity: usize,

    /// Overflow behavior of the pending queue.
    pub overflow: OverflowPolicy,

    /// How many times a transient send failure is retried before the
    /// envelope is dropped.
    pub max_retries: u32,

    /// Delay schedule between delivery retries.
    pub retry_backoff: BackoffPolicy,

    /// Flush deadline used by `close` when shutting the transport down.
    pub shutdown_timeout: Duration,

    /// Ordered event-processor pipeline, run before scope merge.
    pub processors: Vec<Arc<dyn EventProcessor>>,
}

impl ClientOptions {
    /// Creates options for the given DSN with all defaults.
    pub fn new(dsn: impl Into<String>) -> Self {
        Self {
            dsn: dsn.into(),
            sample_rate: 1.0,
            max_breadcrumbs: DEFAULT_MAX_BREADCRUMBS,
            attach_stacktrace: false,
            queue_capacity: 1024,
            overflow: OverflowPolicy::default(),
            max_retries: 3,
            retry_backoff: BackoffPolicy::default(),
            shutdown_timeout: Duration::from_secs(2),
            processors: Vec::new(),
        }
    }

    /// Sets the sampling rate (validated at client construction).
    #[inline]
    pub fn with_sample_rate(mut self, rate: f64) -> Self {
        self.sample_rate = rate;
        self
    }

    /// Sets the breadcrumb ring capacity.
    #[inline]
    pub fn with_max_breadcrumbs(mut self, max: usize) -> Self {
        self.max_breadcrumbs = max;
        self
    }

    /// Enables stacktrace capture for exception events.
    #[inline]
    pub fn with_attach_stacktrace(mut self, attach: bool) -> Self {
        self.attach_stacktrace = attach;
        self
    }

    /// Sets the pending-queue capacity.
    #[inline]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Sets the queue overflow policy.
    #[inline]
    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    /// Sets the retry bound for transient delivery failures.
    #[inline]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Sets the retry backoff schedule.
    #[inline]
    pub fn with_retry_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Sets the implicit flush deadline used by `close`.
    #[inline]
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Appends an event processor to the pipeline (registration order is
    /// execution order).
    #[inline]
    pub fn with_processor(mut self, processor: Arc<dyn EventProcessor>) -> Self {
        self.processors.push(processor);
        self
    }

    /// Returns the queue capacity clamped to a minimum of 1.
    #[inline]
    pub fn queue_capacity_clamped(&self) -> usize {
        self.queue_capacity.max(1)
    }
}

impl std::fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientOptions")
            .field("dsn", &self.dsn)
            .field("sample_rate", &self.sample_rate)
            .field("max_breadcrumbs", &self.max_breadcrumbs)
            .field("attach_stacktrace", &self.attach_stacktrace)
            .field("queue_capacity", &self.queue_capacity)
            .field("overflow", &self.overflow)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff", &self.retry_backoff)
            .field("shutdown_timeout", &self.shutdown_timeout)
            .field("processors", &self.processors.len())
            .finish()
    }
}
