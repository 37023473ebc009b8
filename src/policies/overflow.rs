//! # Overflow policy for the transport's pending queue.
//!
//! When `enqueue` finds the bounded queue at capacity, one envelope has to
//! be sacrificed. [`OverflowPolicy`] decides which end of the queue loses:
//!
//! - [`OverflowPolicy::DropOldest`] evicts the head so the most recent
//!   signal is admitted (recommended: the newest event usually describes
//!   the state that matters now);
//! - [`OverflowPolicy::DropNewest`] rejects the incoming envelope and
//!   leaves the queue untouched.
//!
//! Either way the affected envelope is silently dropped; enqueue never
//! blocks and never reports an error to the capture path.

/// Which pending envelope to drop when the queue is full.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Evict the oldest pending envelope and admit the new one.
    #[default]
    DropOldest,

    /// Reject the new envelope; pending ones keep their place.
    DropNewest,
}

impl OverflowPolicy {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            OverflowPolicy::DropOldest => "drop_oldest",
            OverflowPolicy::DropNewest => "drop_newest",
        }
    }
}
