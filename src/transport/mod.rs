//! # Transport: decoupling event production from delivery.
//!
//! The transport owns a bounded queue of finished envelopes and a single
//! background worker that sends them to the collector, so that capture
//! calls return immediately no matter how slow or broken the network is.
//!
//! ## Architecture
//! ```text
//! capture path (many callers):           background (one worker):
//!   Client ── enqueue(Envelope) ──► [PendingQueue] ──► worker ──► Sender::send()
//!                 │ non-blocking        bounded            │          │
//!                 │ drop-on-full        (OverflowPolicy)   │     retry transient,
//!                 ▼                                        │     drop permanent
//!               bool (admitted?)                           ▼
//!                                              flush()/close() drain-or-deadline
//! ```
//!
//! ## Rules
//! - `enqueue` never blocks and never errors; a full queue costs one
//!   envelope (which one is the [`OverflowPolicy`](crate::OverflowPolicy)'s
//!   call).
//! - Exactly one worker sends; `enqueue` is safe from arbitrarily many
//!   concurrent callers.
//! - Delivery order is best-effort FIFO: an envelope being retried can
//!   land after later-enqueued ones.
//! - `flush`/`close` are the only operations that wait.
//!
//! ## Contents
//! - [`Transport`] the queueing/flushing seam the client talks to
//! - [`Sender`] the wire seam a delivery backend implements
//! - [`AsyncTransport`] the production implementation (worker + queue)
//! - [`Envelope`], [`PayloadKind`], [`HintMeta`] the delivery contract
//! - [`DiscardSender`] stand-in sender when no delivery backend is wired
//! - `HttpSender` JSON-over-HTTP backend (cargo feature `http`)

use std::time::Duration;

use async_trait::async_trait;

use crate::error::DeliveryError;

mod envelope;
mod queue;
mod worker;

#[cfg(feature = "http")]
mod http;

pub use envelope::{Envelope, HintMeta, PayloadKind};
pub use worker::{AsyncTransport, DeliveryParams};

#[cfg(feature = "http")]
pub use http::HttpSender;

pub(crate) use queue::PendingQueue;

/// Queueing and flushing seam between the client and the delivery worker.
///
/// Implementations must keep `enqueue` non-blocking; `flush` and `close`
/// are the only suspension points. An envelope accepted here is either
/// delivered, retried then dropped, or dropped for capacity, never
/// partially delivered.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Admits an envelope for asynchronous delivery.
    ///
    /// Returns `false` when the envelope was not admitted (queue at
    /// capacity under a drop-newest policy, or transport already closed).
    /// Never blocks.
    fn enqueue(&self, envelope: Envelope) -> bool;

    /// Waits until the queue empties and in-flight sends complete, or the
    /// deadline passes. `true` means fully drained.
    ///
    /// Safe to call concurrently with ongoing `enqueue` calls; holds no
    /// lock shared with the capture pipeline.
    async fn flush(&self, timeout: Duration) -> bool;

    /// Flush with the transport's implicit deadline, then release the
    /// worker. Further `enqueue` calls are rejected.
    async fn close(&self) -> bool;
}

/// Wire seam to the remote collector.
///
/// One `send` call delivers one envelope; the worker layers retry and
/// drop semantics on top based on [`DeliveryError::is_retryable`].
#[async_trait]
pub trait Sender: Send + Sync + 'static {
    /// Delivers a single envelope.
    async fn send(&self, envelope: &Envelope) -> Result<(), DeliveryError>;
}

/// Sender used when no delivery backend is configured.
///
/// Envelopes are acknowledged and discarded; with the `http` feature
/// enabled the client wires an `HttpSender` instead.
pub struct DiscardSender;

#[async_trait]
impl Sender for DiscardSender {
    async fn send(&self, envelope: &Envelope) -> Result<(), DeliveryError> {
        tracing::debug!(
            target: "faultline",
            event_id = %envelope.event_id,
            "no delivery backend configured; envelope discarded"
        );
        Ok(())
    }
}
