//! Bounded in-memory event log.
//!
//! Every notable game event (session started, move rejected, crash
//! validated, session expired, ...) is appended here as a human-readable
//! line. The log keeps the most recent entries and drops the oldest.

use std::collections::VecDeque;
use std::sync::{PoisonError, RwLock};

/// Default number of retained entries.
pub const DEFAULT_EVENT_LOG_CAPACITY: usize = 100;

/// A FIFO ring of the most recent event messages.
#[derive(Debug)]
pub struct EventLog {
    entries: RwLock<VecDeque<String>>,
    capacity: usize,
}

impl EventLog {
    /// Creates an empty log holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Adds `message` at the tail, evicting the oldest entry if full.
    pub fn append(&self, message: impl Into<String>) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(message.into());
    }

    /// A copy of the current entries, oldest first.
    pub fn snapshot(&self) -> Vec<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_LOG_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let log = EventLog::default();
        log.append("a");
        log.append(String::from("b"));

        assert_eq!(log.snapshot(), vec!["a", "b"]);
    }

    #[test]
    fn test_append_past_capacity_keeps_most_recent_in_order() {
        let log = EventLog::default();
        for i in 0..250 {
            log.append(format!("event {i}"));
        }

        let entries = log.snapshot();

        assert_eq!(entries.len(), 100);
        assert_eq!(entries.first().unwrap(), "event 150");
        assert_eq!(entries.last().unwrap(), "event 249");
        assert!(entries.windows(2).all(|w| {
            let a: u32 = w[0].trim_start_matches("event ").parse().unwrap();
            let b: u32 = w[1].trim_start_matches("event ").parse().unwrap();
            b == a + 1
        }));
    }

    #[test]
    fn test_snapshot_is_detached_copy() {
        let log = EventLog::new(2);
        log.append("one");
        let snap = log.snapshot();

        log.append("two");
        log.append("three");

        assert_eq!(snap, vec!["one"]);
        assert_eq!(log.snapshot(), vec!["two", "three"]);
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let log = EventLog::new(0);
        log.append("x");
        log.append("y");

        assert_eq!(log.capacity(), 1);
        assert_eq!(log.snapshot(), vec!["y"]);
    }
}
