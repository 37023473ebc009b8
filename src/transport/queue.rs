//! Bounded pending-envelope storage with a configurable overflow policy.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::policies::OverflowPolicy;
use crate::transport::Envelope;

/// FIFO of envelopes awaiting delivery, owned exclusively by the transport.
///
/// `push` never blocks: at capacity it sacrifices one envelope according
/// to the [`OverflowPolicy`] and keeps count of everything dropped.
pub(crate) struct PendingQueue {
    inner: Mutex<VecDeque<Envelope>>,
    capacity: usize,
    policy: OverflowPolicy,
    dropped: AtomicU64,
}

impl PendingQueue {
    /// Creates a queue with the given capacity (clamped to a minimum of 1).
    pub fn new(capacity: usize, policy: OverflowPolicy) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            policy,
            dropped: AtomicU64::new(0),
        }
    }

    /// Admits an envelope, resolving overflow per the policy.
    ///
    /// Returns `true` when the given envelope was admitted (under
    /// `DropOldest` that is always the case; the head pays instead).
    pub fn push(&self, envelope: Envelope) -> bool {
        let mut queue = self.lock();
        if queue.len() >= self.capacity {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            match self.policy {
                OverflowPolicy::DropOldest => {
                    let evicted = queue.pop_front();
                    if let Some(evicted) = evicted {
                        tracing::warn!(
                            target: "faultline",
                            event_id = %evicted.event_id,
                            policy = self.policy.as_label(),
                            "pending queue full; evicted oldest envelope"
                        );
                    }
                    queue.push_back(envelope);
                    true
                }
                OverflowPolicy::DropNewest => {
                    tracing::warn!(
                        target: "faultline",
                        event_id = %envelope.event_id,
                        policy = self.policy.as_label(),
                        "pending queue full; rejected new envelope"
                    );
                    false
                }
            }
        } else {
            queue.push_back(envelope);
            true
        }
    }

    /// Removes the oldest pending envelope.
    pub fn pop(&self) -> Option<Envelope> {
        self.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Total envelopes sacrificed to overflow so far.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Poison-tolerant lock; queue state stays usable even if a holder
    /// panicked.
    fn lock(&self) -> MutexGuard<'_, VecDeque<Envelope>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Event, EventHint, Level};

    fn envelope(msg: &str) -> Envelope {
        Envelope::new(Event::from_message(msg, Level::Info), &EventHint::none())
    }

    fn messages(queue: &PendingQueue) -> Vec<String> {
        let mut out = Vec::new();
        while let Some(env) = queue.pop() {
            out.push(env.event.message.unwrap_or_default());
        }
        out
    }

    #[test]
    fn test_fifo_order() {
        let queue = PendingQueue::new(4, OverflowPolicy::DropOldest);
        for msg in ["a", "b", "c"] {
            assert!(queue.push(envelope(msg)));
        }
        assert_eq!(messages(&queue), ["a", "b", "c"]);
    }

    #[test]
    fn test_drop_oldest_admits_newest() {
        let queue = PendingQueue::new(2, OverflowPolicy::DropOldest);
        assert!(queue.push(envelope("a")));
        assert!(queue.push(envelope("b")));
        assert!(queue.push(envelope("c")));
        assert_eq!(queue.dropped(), 1);
        assert_eq!(messages(&queue), ["b", "c"]);
    }

    #[test]
    fn test_drop_newest_rejects_incoming() {
        let queue = PendingQueue::new(2, OverflowPolicy::DropNewest);
        assert!(queue.push(envelope("a")));
        assert!(queue.push(envelope("b")));
        assert!(!queue.push(envelope("c")));
        assert_eq!(queue.dropped(), 1);
        assert_eq!(messages(&queue), ["a", "b"]);
    }

    #[test]
    fn test_capacity_clamped_to_one() {
        let queue = PendingQueue::new(0, OverflowPolicy::DropOldest);
        assert!(queue.push(envelope("a")));
        assert!(queue.push(envelope("b")));
        assert_eq!(messages(&queue), ["b"]);
    }
}
