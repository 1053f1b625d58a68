//! Discrete-event queue
//!
//! Events are ordered by time, then by insertion order, so two events at the
//! same instant run in the order they were scheduled.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

use icn_core::SimTime;
use icn_peer::TimerHandle;

struct Entry<E> {
    at: SimTime,
    seq: u64,
    event: E,
    /// Set for timer events; a cancelled handle makes the entry dead
    handle: Option<TimerHandle>,
}

impl<E> PartialEq for Entry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at && self.seq == other.seq
    }
}

impl<E> Eq for Entry<E> {}

impl<E> PartialOrd for Entry<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Entry<E> {
    // Reversed: BinaryHeap is a max-heap and we want the earliest entry
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .at
            .cmp(&self.at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Time-ordered event queue with a simulated clock
pub struct EventQueue<E> {
    heap: BinaryHeap<Entry<E>>,
    now: SimTime,
    next_seq: u64,
}

impl<E> EventQueue<E> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            now: SimTime::ZERO,
            next_seq: 0,
        }
    }

    /// Current simulated time
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Queue `event` to run `delay` from now
    pub fn push(&mut self, delay: Duration, event: E) {
        self.push_entry(delay, event, None);
    }

    /// Queue a timer event that is skipped if `handle` is cancelled first
    pub fn push_timer(&mut self, delay: Duration, event: E) -> TimerHandle {
        let handle = TimerHandle::pending();
        self.push_entry(delay, event, Some(handle.clone()));
        handle
    }

    fn push_entry(&mut self, delay: Duration, event: E, handle: Option<TimerHandle>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry {
            at: self.now + delay,
            seq,
            event,
            handle,
        });
    }

    /// Pop the next live event at or before `until` and advance the clock to it
    ///
    /// Cancelled timers are discarded on the way.
    pub fn pop_until(&mut self, until: SimTime) -> Option<(SimTime, E)> {
        while self.heap.peek().is_some_and(|e| e.at <= until) {
            let entry = self.heap.pop()?;
            if let Some(handle) = &entry.handle {
                if !handle.fire() {
                    continue;
                }
            }
            self.now = entry.at;
            return Some((entry.at, entry.event));
        }
        None
    }

    /// Move the clock forward without running anything
    ///
    /// Never moves the clock backwards.
    pub fn advance_to(&mut self, at: SimTime) {
        if at > self.now {
            self.now = at;
        }
    }

    /// Time of the earliest queued entry, live or not
    pub fn peek_time(&self) -> Option<SimTime> {
        self.heap.peek().map(|e| e.at)
    }

    /// Queued entries, including cancelled timers not yet discarded
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_time_order() {
        let mut queue = EventQueue::new();
        queue.push(ms(30), "c");
        queue.push(ms(10), "a");
        queue.push(ms(20), "b");

        let order: Vec<_> = std::iter::from_fn(|| queue.pop_until(SimTime::from_millis(100)))
            .map(|(_, e)| e)
            .collect();
        assert_eq!(order, vec!["a", "b", "c"]);
        assert_eq!(queue.now(), SimTime::from_millis(30));
    }

    #[test]
    fn test_ties_in_insertion_order() {
        let mut queue = EventQueue::new();
        for i in 0..5 {
            queue.push(ms(10), i);
        }
        let order: Vec<_> = std::iter::from_fn(|| queue.pop_until(SimTime::from_millis(10)))
            .map(|(_, e)| e)
            .collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_cancelled_timer_skipped() {
        let mut queue = EventQueue::new();
        let handle = queue.push_timer(ms(10), "timer");
        queue.push(ms(20), "packet");
        handle.cancel();

        let (at, event) = queue.pop_until(SimTime::from_millis(100)).unwrap();
        assert_eq!(event, "packet");
        assert_eq!(at, SimTime::from_millis(20));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_fired_timer_not_pending() {
        let mut queue = EventQueue::new();
        let handle = queue.push_timer(ms(5), ());
        assert!(handle.is_pending());
        queue.pop_until(SimTime::from_millis(5)).unwrap();
        assert!(!handle.is_pending());
    }

    #[test]
    fn test_horizon() {
        let mut queue = EventQueue::new();
        queue.push(ms(50), 1);
        assert!(queue.pop_until(SimTime::from_millis(49)).is_none());
        assert_eq!(queue.now(), SimTime::ZERO);
        queue.advance_to(SimTime::from_millis(49));
        assert_eq!(queue.now(), SimTime::from_millis(49));
        assert_eq!(queue.peek_time(), Some(SimTime::from_millis(50)));
    }
}
