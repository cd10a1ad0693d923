//! Collapse events of one kinetic translation, ordered by time.
//!
//! The queue lives for a single translation. It stays small (a handful of
//! entries), so a sorted vector with linear removal beats anything
//! cleverer.

use crate::triangulation::{TriangleId, Triangulation};

/// Two events closer than this count as simultaneous for the stability
/// scan.
pub const EPS_EVENT_TIME: f64 = 1e-5;

pub struct EventQueue {
    /// (collapse time, triangle), ascending by time; equal times keep
    /// their insertion order.
    events: Vec<(f64, TriangleId)>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Ordered insert; the ordering of the whole queue is not re-checked.
    pub fn insert_without_check(&mut self, time: f64, triangle: TriangleId) {
        let pos = self.events.partition_point(|&(t, _)| t <= time);
        self.events.insert(pos, (time, triangle));
    }

    /// Remove and return the earliest event.
    pub fn pop(&mut self) -> Option<(f64, TriangleId)> {
        if self.events.is_empty() {
            None
        } else {
            Some(self.events.remove(0))
        }
    }

    /// Drop the event of `triangle`, if enqueued.
    pub fn remove(&mut self, triangle: TriangleId) {
        if let Some(pos) = self.events.iter().position(|&(_, t)| t == triangle) {
            self.events.remove(pos);
        }
    }

    /// Scan for runs of near-simultaneous events. Three or more events
    /// with consecutive gaps below `EPS_EVENT_TIME` make the ordering
    /// untrustworthy and the translation must be aborted; a pair is
    /// tolerated.
    ///
    /// The convexity-based reordering of such a pair is intentionally not
    /// performed; it has not proven itself in practice.
    pub fn make_stable(&self) -> bool {
        for w in self.events.windows(3) {
            let (t0, t1, t2) = (w[0].0, w[1].0, w[2].0);
            if t1 - t0 < EPS_EVENT_TIME && t2 - t1 < EPS_EVENT_TIME {
                return false;
            }
        }
        true
    }

    /// Clear the queue, resetting the enqueued flag of every remaining
    /// triangle. Needed on the abort paths, where events survive.
    pub fn clear(&mut self, tri: &mut Triangulation) {
        for (_, t) in self.events.drain(..) {
            tri.set_enqueued(t, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulation::TriangleId;

    fn t(n: u64) -> TriangleId {
        TriangleId(n)
    }

    #[test]
    fn pops_in_time_order() {
        let mut q = EventQueue::new();
        q.insert_without_check(0.7, t(1));
        q.insert_without_check(0.2, t(2));
        q.insert_without_check(0.5, t(3));

        assert_eq!(q.pop(), Some((0.2, t(2))));
        assert_eq!(q.pop(), Some((0.5, t(3))));
        assert_eq!(q.pop(), Some((0.7, t(1))));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn equal_times_keep_insertion_order() {
        let mut q = EventQueue::new();
        q.insert_without_check(0.5, t(1));
        q.insert_without_check(0.5, t(2));
        assert_eq!(q.pop(), Some((0.5, t(1))));
        assert_eq!(q.pop(), Some((0.5, t(2))));
    }

    #[test]
    fn remove_by_triangle() {
        let mut q = EventQueue::new();
        q.insert_without_check(0.1, t(1));
        q.insert_without_check(0.2, t(2));
        q.remove(t(1));
        assert_eq!(q.len(), 1);
        assert_eq!(q.pop(), Some((0.2, t(2))));
    }

    #[test]
    fn a_near_simultaneous_pair_is_stable() {
        let mut q = EventQueue::new();
        q.insert_without_check(0.5, t(1));
        q.insert_without_check(0.5 + 0.5 * EPS_EVENT_TIME, t(2));
        q.insert_without_check(0.9, t(3));
        assert!(q.make_stable());
    }

    #[test]
    fn a_near_simultaneous_triple_is_not() {
        let mut q = EventQueue::new();
        q.insert_without_check(0.5, t(1));
        q.insert_without_check(0.5 + 0.4 * EPS_EVENT_TIME, t(2));
        q.insert_without_check(0.5 + 0.8 * EPS_EVENT_TIME, t(3));
        assert!(!q.make_stable());
    }
}
