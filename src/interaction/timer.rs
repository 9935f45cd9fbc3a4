//! One-shot delayed callbacks for the UI thread
//!
//! Nothing runs in the background: the owner calls [`DeferredQueue::drain_due`]
//! from its update loop and uses [`DeferredQueue::next_deadline`] to ask for
//! a repaint in time.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Entry<T> {
    id: TimerId,
    deadline: Instant,
    payload: T,
}

#[derive(Debug)]
pub struct DeferredQueue<T> {
    entries: Vec<Entry<T>>,
    next_id: u64,
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T> DeferredQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `payload` once `delay` has passed since `now`
    pub fn schedule(&mut self, now: Instant, delay: Duration, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            deadline: now + delay,
            payload,
        });
        id
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    /// Remove and return every payload due at `now`, earliest deadline first.
    /// Payloads with equal deadlines come out in scheduling order.
    pub fn drain_due(&mut self, now: Instant) -> Vec<T> {
        let (mut due, pending): (Vec<Entry<T>>, Vec<Entry<T>>) = self
            .entries
            .drain(..)
            .partition(|entry| entry.deadline <= now);
        self.entries = pending;

        due.sort_by_key(|entry| (entry.deadline, entry.id.0));
        due.into_iter().map(|entry| entry.payload).collect()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|entry| entry.deadline).min()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_deadline_order() {
        let start = Instant::now();
        let mut queue = DeferredQueue::new();
        queue.schedule(start, Duration::from_millis(400), "late");
        queue.schedule(start, Duration::from_millis(100), "early");
        queue.schedule(start, Duration::from_millis(100), "early-second");

        assert!(queue.drain_due(start).is_empty());
        assert_eq!(queue.next_deadline(), Some(start + Duration::from_millis(100)));

        let fired = queue.drain_due(start + Duration::from_millis(100));
        assert_eq!(fired, vec!["early", "early-second"]);
        assert_eq!(queue.len(), 1);

        let fired = queue.drain_due(start + Duration::from_secs(1));
        assert_eq!(fired, vec!["late"]);
        assert!(queue.is_empty());
        assert_eq!(queue.next_deadline(), None);
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut queue = DeferredQueue::new();
        let id = queue.schedule(start, Duration::from_millis(10), 1);
        queue.schedule(start, Duration::from_millis(10), 2);

        assert!(queue.cancel(id));
        assert!(!queue.cancel(id));
        assert_eq!(queue.drain_due(start + Duration::from_millis(10)), vec![2]);

        queue.schedule(start, Duration::from_millis(10), 3);
        queue.cancel_all();
        assert!(queue.drain_due(start + Duration::from_secs(1)).is_empty());
    }
}
