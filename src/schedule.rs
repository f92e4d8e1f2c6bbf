use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Tick-counted deferred task queue. Tasks fire in order of due tick, then insertion order.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: u64,
    seq: u64,
    queue: BinaryHeap<Entry<T>>,
}

#[derive(Debug)]
struct Entry<T> {
    due: u64,
    seq: u64,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// BinaryHeap is a max-heap: the earliest entry has to compare greatest.
impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: 0,
            seq: 0,
            queue: BinaryHeap::new(),
        }
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn has_pending(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Queue `task` to fire once `ticks` more ticks have elapsed.
    pub fn schedule_after(&mut self, task: T, ticks: u64) {
        let entry = Entry {
            due: self.now + ticks.max(1),
            seq: self.seq,
            task,
        };
        self.seq += 1;
        self.queue.push(entry);
    }

    /// Advance one tick and return every task now due.
    pub fn advance(&mut self) -> Vec<T> {
        self.now += 1;
        let mut due = Vec::new();
        while self.queue.peek().is_some_and(|entry| entry.due <= self.now) {
            if let Some(entry) = self.queue.pop() {
                due.push(entry.task);
            }
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_after_requested_ticks() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_after("a", 3);
        assert!(scheduler.advance().is_empty());
        assert!(scheduler.advance().is_empty());
        assert_eq!(scheduler.advance(), vec!["a"]);
        assert!(!scheduler.has_pending());
    }

    #[test]
    fn same_tick_keeps_insertion_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_after(1, 2);
        scheduler.schedule_after(2, 1);
        scheduler.schedule_after(3, 2);
        assert_eq!(scheduler.advance(), vec![2]);
        assert_eq!(scheduler.advance(), vec![1, 3]);
    }

    #[test]
    fn zero_delay_waits_for_next_tick() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_after((), 0);
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.advance().len(), 1);
    }
}
