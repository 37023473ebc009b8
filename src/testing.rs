//! # Test support: capturing what the transport would have sent.
//!
//! [`TestSender`] implements [`Sender`] against in-memory storage, with a
//! scriptable failure queue to exercise the worker's retry and drop
//! paths. Available to external consumers through the `test` cargo
//! feature; the crate's own tests use it directly.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use faultline::{Client, ClientOptions, Hub, Level, Scope};
//! use faultline::testing::TestSender;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let sender = TestSender::new_arc();
//! let client = Client::with_sender(
//!     ClientOptions::new("https://key@collector.test/1"),
//!     sender.clone(),
//! ).unwrap();
//!
//! let hub = Hub::new(Some(client), Scope::default());
//! hub.capture_message("hello", Level::Info);
//! hub.flush(std::time::Duration::from_secs(1)).await;
//!
//! assert_eq!(sender.sent_messages(), ["hello"]);
//! # }
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::DeliveryError;
use crate::transport::{Envelope, Sender};

/// In-memory [`Sender`] recording every envelope it accepts.
///
/// Failures queued with [`TestSender::fail_next`] are injected one per
/// send call, in order, before sends start succeeding again.
#[derive(Default)]
pub struct TestSender {
    sent: Mutex<Vec<Envelope>>,
    script: Mutex<VecDeque<DeliveryError>>,
    attempts: AtomicUsize,
}

impl TestSender {
    /// Creates an empty sender.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty sender behind an `Arc`, ready to hand to
    /// [`Client::with_sender`](crate::Client::with_sender).
    pub fn new_arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Queues a failure for the next send call.
    pub fn fail_next(&self, err: DeliveryError) {
        self.lock_script().push_back(err);
    }

    /// Envelopes accepted so far, in delivery order.
    pub fn sent(&self) -> Vec<Envelope> {
        self.lock_sent().clone()
    }

    /// Message bodies of accepted envelopes, in delivery order.
    pub fn sent_messages(&self) -> Vec<String> {
        self.lock_sent()
            .iter()
            .filter_map(|env| env.event.message.clone())
            .collect()
    }

    /// Number of envelopes accepted so far.
    pub fn sent_count(&self) -> usize {
        self.lock_sent().len()
    }

    /// Total send calls observed, including injected failures.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn lock_sent(&self) -> MutexGuard<'_, Vec<Envelope>> {
        self.sent.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn lock_script(&self) -> MutexGuard<'_, VecDeque<DeliveryError>> {
        self.script.lock().unwrap_or_else(|p| p.into_inner())
    }
}

#[async_trait]
impl Sender for TestSender {
    async fn send(&self, envelope: &Envelope) -> Result<(), DeliveryError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.lock_script().pop_front() {
            return Err(err);
        }
        self.lock_sent().push(envelope.clone());
        Ok(())
    }
}
