//! # AsyncTransport: the background delivery worker.
//!
//! One tokio task drains the pending queue and delivers envelopes one at
//! a time through a [`Sender`]. Transient failures are retried a bounded
//! number of times with backoff; permanent failures and exhausted retries
//! drop the envelope with a warning.
//!
//! ## Worker loop
//! ```text
//! loop {
//!   ├─► mark in-flight, pop envelope
//!   │     ├─ Some ──► deliver():
//!   │     │            ├─ Ok            ─► done
//!   │     │            ├─ retryable     ─► sleep(backoff.delay(attempt)), retry
//!   │     │            │                   (bounded by max_retries, cancellable)
//!   │     │            └─ permanent     ─► drop with warning
//!   │     └─ None ──► clear in-flight, notify flushers, wait:
//!   │                   ├─ wakeup (enqueue)   ─► continue
//!   │                   └─ shutdown cancelled ─► exit
//! }
//! ```
//!
//! ## Flush semantics
//! `flush(timeout)` observes "idle" = queue empty **and** nothing in
//! flight. The worker pings flushers after every completed delivery, and
//! flushers re-check idleness before each wait, so an empty transport
//! answers `true` without waiting and `flush(Duration::ZERO)` on a busy
//! transport answers `false`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::DeliveryError;
use crate::policies::{BackoffPolicy, OverflowPolicy};
use crate::transport::{Envelope, PendingQueue, Sender, Transport};

/// Delivery knobs extracted from the client options.
#[derive(Clone, Copy, Debug)]
pub struct DeliveryParams {
    /// Transient-failure retries per envelope.
    pub max_retries: u32,
    /// Delay schedule between retries.
    pub backoff: BackoffPolicy,
}

/// Shared state between the handle, the worker, and flushers.
struct Shared {
    queue: PendingQueue,
    /// Worker wakeup; `enqueue` stores a permit so a wakeup between
    /// drain and wait is never lost.
    wakeup: Notify,
    /// Pinged by the worker after each completed delivery; flushers wait
    /// on this and re-check idleness.
    drained: Notify,
    /// True while the worker holds an envelope it has not finished with.
    in_flight: AtomicBool,
    shutdown: CancellationToken,
}

impl Shared {
    fn is_idle(&self) -> bool {
        self.queue.is_empty() && !self.in_flight.load(Ordering::SeqCst)
    }
}

/// Production transport: bounded queue plus one background worker task.
///
/// Construction spawns the worker and therefore requires a running tokio
/// runtime. Dropping the transport without [`Transport::close`] leaves
/// pending envelopes to the fate of the runtime; call `close` (or
/// [`Hub::flush`](crate::Hub::flush)) before exiting when the backlog
/// matters.
pub struct AsyncTransport {
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
    close_timeout: Duration,
}

impl AsyncTransport {
    /// Spawns the worker and returns the handle the client enqueues into.
    ///
    /// Must be called inside a tokio runtime.
    pub fn spawn(
        capacity: usize,
        overflow: OverflowPolicy,
        params: DeliveryParams,
        close_timeout: Duration,
        sender: Arc<dyn Sender>,
    ) -> Self {
        let shared = Arc::new(Shared {
            queue: PendingQueue::new(capacity, overflow),
            wakeup: Notify::new(),
            drained: Notify::new(),
            in_flight: AtomicBool::new(false),
            shutdown: CancellationToken::new(),
        });

        let worker_shared = Arc::clone(&shared);
        let handle = tokio::spawn(async move {
            worker_loop(worker_shared, params, sender).await;
        });

        Self {
            shared,
            worker: Mutex::new(Some(handle)),
            close_timeout,
        }
    }

    /// Envelopes sacrificed to queue overflow so far.
    pub fn dropped(&self) -> u64 {
        self.shared.queue.dropped()
    }

    async fn flush_with_deadline(&self, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.shared.is_idle() {
                return true;
            }
            let notified = self.shared.drained.notified();
            tokio::pin!(notified);
            // Register the waiter first, then re-check: the worker may
            // have gone idle in between, and an unregistered waiter would
            // miss its ping.
            notified.as_mut().enable();
            if self.shared.is_idle() {
                return true;
            }
            match tokio::time::timeout_at(deadline, notified).await {
                Ok(()) => continue,
                Err(_) => return self.shared.is_idle(),
            }
        }
    }
}

#[async_trait]
impl Transport for AsyncTransport {
    fn enqueue(&self, envelope: Envelope) -> bool {
        if self.shared.shutdown.is_cancelled() {
            tracing::debug!(
                target: "faultline",
                event_id = %envelope.event_id,
                "transport closed; envelope rejected"
            );
            return false;
        }
        let admitted = self.shared.queue.push(envelope);
        if admitted {
            self.shared.wakeup.notify_one();
        }
        admitted
    }

    async fn flush(&self, timeout: Duration) -> bool {
        self.flush_with_deadline(timeout).await
    }

    async fn close(&self) -> bool {
        let drained = self.flush_with_deadline(self.close_timeout).await;
        self.shared.shutdown.cancel();
        let handle = self.worker.lock().unwrap_or_else(|p| p.into_inner()).take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
        drained
    }
}

async fn worker_loop(shared: Arc<Shared>, params: DeliveryParams, sender: Arc<dyn Sender>) {
    loop {
        // Once the transport is closed, whatever is left in the queue
        // missed the close deadline and is forfeit.
        if shared.shutdown.is_cancelled() {
            break;
        }
        // Mark in-flight before popping so flushers never observe an
        // empty queue while an envelope is still being worked on.
        shared.in_flight.store(true, Ordering::SeqCst);
        match shared.queue.pop() {
            Some(envelope) => {
                deliver(&shared, &params, sender.as_ref(), envelope).await;
                shared.in_flight.store(false, Ordering::SeqCst);
                shared.drained.notify_waiters();
            }
            None => {
                shared.in_flight.store(false, Ordering::SeqCst);
                shared.drained.notify_waiters();
                tokio::select! {
                    _ = shared.wakeup.notified() => {}
                    _ = shared.shutdown.cancelled() => break,
                }
            }
        }
    }
}

/// Delivers one envelope, retrying transient failures up to the bound.
async fn deliver(
    shared: &Shared,
    params: &DeliveryParams,
    sender: &dyn Sender,
    envelope: Envelope,
) {
    let mut attempt: u32 = 0;
    loop {
        let outcome = tokio::select! {
            result = sender.send(&envelope) => result,
            _ = shared.shutdown.cancelled() => {
                tracing::warn!(
                    target: "faultline",
                    event_id = %envelope.event_id,
                    "shutdown during delivery; envelope dropped"
                );
                return;
            }
        };
        match outcome {
            Ok(()) => {
                tracing::debug!(
                    target: "faultline",
                    event_id = %envelope.event_id,
                    attempt,
                    "envelope delivered"
                );
                return;
            }
            Err(err) if err.is_retryable() && attempt < params.max_retries => {
                let delay = params.backoff.delay(attempt);
                attempt += 1;
                tracing::warn!(
                    target: "faultline",
                    event_id = %envelope.event_id,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "transient delivery failure; retrying"
                );
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = shared.shutdown.cancelled() => {
                        tracing::warn!(
                            target: "faultline",
                            event_id = %envelope.event_id,
                            "shutdown during retry backoff; envelope dropped"
                        );
                        return;
                    }
                }
            }
            Err(err) => {
                tracing::warn!(
                    target: "faultline",
                    event_id = %envelope.event_id,
                    attempt,
                    label = err.as_label(),
                    error = %err,
                    "envelope dropped"
                );
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::JitterPolicy;
    use crate::protocol::{Event, EventHint, Level};
    use crate::testing::TestSender;
    use tokio::sync::Semaphore;

    fn envelope(msg: &str) -> Envelope {
        Envelope::new(Event::from_message(msg, Level::Info), &EventHint::none())
    }

    fn fast_backoff() -> BackoffPolicy {
        BackoffPolicy {
            initial: Duration::from_millis(5),
            cap: Duration::from_millis(20),
            factor: 2.0,
            jitter: JitterPolicy::None,
        }
    }

    fn transport(sender: Arc<dyn Sender>, capacity: usize, overflow: OverflowPolicy) -> AsyncTransport {
        AsyncTransport::spawn(
            capacity,
            overflow,
            DeliveryParams {
                max_retries: 3,
                backoff: fast_backoff(),
            },
            Duration::from_secs(1),
            sender,
        )
    }

    /// Sender that blocks every send on a semaphore, reporting when a
    /// send has started.
    struct GateSender {
        started: Notify,
        gate: Semaphore,
        inner: Arc<TestSender>,
    }

    impl GateSender {
        fn new(inner: Arc<TestSender>) -> Arc<Self> {
            Arc::new(Self {
                started: Notify::new(),
                gate: Semaphore::new(0),
                inner,
            })
        }

        fn open(&self) {
            self.gate.add_permits(Semaphore::MAX_PERMITS / 2);
        }
    }

    #[async_trait]
    impl Sender for GateSender {
        async fn send(&self, envelope: &Envelope) -> Result<(), DeliveryError> {
            self.started.notify_one();
            let _permit = self.gate.acquire().await.expect("gate closed");
            self.inner.send(envelope).await
        }
    }

    #[tokio::test]
    async fn test_flush_empty_returns_true_immediately() {
        let t = transport(Arc::new(TestSender::new()), 8, OverflowPolicy::DropOldest);
        assert!(t.flush(Duration::ZERO).await);
        assert!(t.close().await);
    }

    #[tokio::test]
    async fn test_flush_zero_with_pending_returns_false() {
        let sender_log = Arc::new(TestSender::new());
        let gate = GateSender::new(sender_log.clone());
        let t = transport(gate.clone(), 8, OverflowPolicy::DropOldest);

        assert!(t.enqueue(envelope("stuck")));
        gate.started.notified().await;
        assert!(!t.flush(Duration::ZERO).await);

        gate.open();
        assert!(t.flush(Duration::from_secs(1)).await);
        assert_eq!(sender_log.sent_messages(), ["stuck"]);
        assert!(t.close().await);
    }

    #[tokio::test]
    async fn test_delivery_in_fifo_order() {
        let sender = Arc::new(TestSender::new());
        let t = transport(sender.clone(), 8, OverflowPolicy::DropOldest);
        for msg in ["a", "b", "c"] {
            assert!(t.enqueue(envelope(msg)));
        }
        assert!(t.flush(Duration::from_secs(1)).await);
        assert_eq!(sender.sent_messages(), ["a", "b", "c"]);
        assert!(t.close().await);
    }

    #[tokio::test]
    async fn test_transient_failure_is_retried() {
        let sender = Arc::new(TestSender::new());
        sender.fail_next(DeliveryError::Transient {
            reason: "connection refused".into(),
        });
        let t = transport(sender.clone(), 8, OverflowPolicy::DropOldest);

        assert!(t.enqueue(envelope("retry-me")));
        assert!(t.flush(Duration::from_secs(2)).await);
        assert_eq!(sender.sent_messages(), ["retry-me"]);
        assert_eq!(sender.attempts(), 2);
        assert!(t.close().await);
    }

    #[tokio::test]
    async fn test_rejection_is_not_retried() {
        let sender = Arc::new(TestSender::new());
        sender.fail_next(DeliveryError::Rejected {
            reason: "bad auth".into(),
        });
        let t = transport(sender.clone(), 8, OverflowPolicy::DropOldest);

        assert!(t.enqueue(envelope("doomed")));
        assert!(t.flush(Duration::from_secs(1)).await);
        assert!(sender.sent_messages().is_empty());
        assert_eq!(sender.attempts(), 1);
        assert!(t.close().await);
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let sender = Arc::new(TestSender::new());
        for _ in 0..10 {
            sender.fail_next(DeliveryError::Transient {
                reason: "still down".into(),
            });
        }
        let t = AsyncTransport::spawn(
            8,
            OverflowPolicy::DropOldest,
            DeliveryParams {
                max_retries: 2,
                backoff: fast_backoff(),
            },
            Duration::from_secs(1),
            sender.clone(),
        );

        assert!(t.enqueue(envelope("dropped-after-retries")));
        assert!(t.flush(Duration::from_secs(2)).await);
        assert!(sender.sent_messages().is_empty());
        // initial attempt plus two retries
        assert_eq!(sender.attempts(), 3);
        assert!(t.close().await);
    }

    #[tokio::test]
    async fn test_overflow_drop_oldest_under_blocked_worker() {
        let sender_log = Arc::new(TestSender::new());
        let gate = GateSender::new(sender_log.clone());
        let t = transport(gate.clone(), 2, OverflowPolicy::DropOldest);

        assert!(t.enqueue(envelope("first")));
        gate.started.notified().await;
        // worker is stuck on "first"; fill the queue past capacity
        assert!(t.enqueue(envelope("second")));
        assert!(t.enqueue(envelope("third")));
        assert!(t.enqueue(envelope("fourth")));
        assert_eq!(t.dropped(), 1);

        gate.open();
        assert!(t.flush(Duration::from_secs(1)).await);
        assert_eq!(sender_log.sent_messages(), ["first", "third", "fourth"]);
        assert!(t.close().await);
    }

    #[tokio::test]
    async fn test_enqueue_after_close_is_rejected() {
        let t = transport(Arc::new(TestSender::new()), 8, OverflowPolicy::DropOldest);
        assert!(t.close().await);
        assert!(!t.enqueue(envelope("late")));
    }
}
