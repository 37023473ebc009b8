//! Bounded breadcrumb storage with FIFO eviction.

use std::collections::VecDeque;

use crate::protocol::Breadcrumb;

/// Insertion-ordered bounded buffer of breadcrumbs.
///
/// The capacity is supplied on each push rather than stored: the limit
/// comes from whatever client is bound when the breadcrumb is recorded,
/// so re-binding a client with a smaller `max_breadcrumbs` truncates on
/// the next append.
#[derive(Clone, Debug, Default)]
pub(crate) struct BreadcrumbRing {
    inner: VecDeque<Breadcrumb>,
}

impl BreadcrumbRing {
    /// Appends a breadcrumb, evicting from the front until the buffer
    /// fits within `max`.
    ///
    /// `max == 0` disables recording entirely (and clears anything held).
    pub fn push(&mut self, crumb: Breadcrumb, max: usize) {
        if max == 0 {
            self.inner.clear();
            return;
        }
        while self.inner.len() >= max {
            self.inner.pop_front();
        }
        self.inner.push_back(crumb);
    }

    /// Chronological iteration, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Breadcrumb> {
        self.inner.iter()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crumb(msg: &str) -> Breadcrumb {
        Breadcrumb::new(msg)
    }

    #[test]
    fn test_push_preserves_order() {
        let mut ring = BreadcrumbRing::default();
        for msg in ["a", "b", "c"] {
            ring.push(crumb(msg), 10);
        }
        let messages: Vec<_> = ring.iter().filter_map(|b| b.message.as_deref()).collect();
        assert_eq!(messages, ["a", "b", "c"]);
    }

    #[test]
    fn test_overflow_evicts_oldest() {
        let mut ring = BreadcrumbRing::default();
        for i in 0..=3 {
            ring.push(crumb(&i.to_string()), 3);
        }
        let messages: Vec<_> = ring.iter().filter_map(|b| b.message.as_deref()).collect();
        assert_eq!(messages, ["1", "2", "3"]);
        assert_eq!(ring.len(), 3);
    }

    #[test]
    fn test_shrinking_max_truncates() {
        let mut ring = BreadcrumbRing::default();
        for i in 0..5 {
            ring.push(crumb(&i.to_string()), 5);
        }
        ring.push(crumb("last"), 2);
        let messages: Vec<_> = ring.iter().filter_map(|b| b.message.as_deref()).collect();
        assert_eq!(messages, ["4", "last"]);
    }

    #[test]
    fn test_zero_max_disables_recording() {
        let mut ring = BreadcrumbRing::default();
        ring.push(crumb("a"), 3);
        ring.push(crumb("b"), 0);
        assert!(ring.is_empty());
    }
}
