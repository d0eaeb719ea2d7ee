// SPDX-License-Identifier: MPL-2.0
//! Bounded event log backing the diagnostics collector.

use std::collections::VecDeque;

pub use crate::domain::diagnostics::BufferCapacity;

/// Keeps the newest `capacity` entries and counts how many were overwritten.
///
/// ```
/// use iced_dehaze::diagnostics::{BufferCapacity, EventLog};
///
/// let mut log: EventLog<&str> = EventLog::new(BufferCapacity::default());
/// log.push("picked");
/// log.push("submitted");
/// assert_eq!(log.iter().copied().collect::<Vec<_>>(), ["picked", "submitted"]);
/// assert_eq!(log.evicted(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct EventLog<T> {
    entries: VecDeque<T>,
    limit: usize,
    evicted: u64,
}

impl<T> EventLog<T> {
    /// Creates an empty log holding at most `capacity` entries.
    #[must_use]
    pub fn new(capacity: BufferCapacity) -> Self {
        Self::with_raw_capacity(capacity.value())
    }

    /// Bypasses the `BufferCapacity` bounds; a zero limit keeps one entry.
    #[must_use]
    pub fn with_raw_capacity(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            entries: VecDeque::with_capacity(limit),
            limit,
            evicted: 0,
        }
    }

    /// Appends an entry, evicting the oldest ones when full.
    pub fn push(&mut self, entry: T) {
        while self.entries.len() >= self.limit {
            if self.entries.pop_front().is_some() {
                self.evicted += 1;
            }
        }
        self.entries.push_back(entry);
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entry is retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of retained entries.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.limit
    }

    /// Entries lost to overflow since creation or the last [`clear`](Self::clear).
    #[must_use]
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Empties the log and resets the eviction count.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.evicted = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_drops_oldest_and_counts_it() {
        let mut log = EventLog::with_raw_capacity(3);
        for step in 1..=5 {
            log.push(step);
        }
        assert_eq!(log.iter().copied().collect::<Vec<_>>(), vec![3, 4, 5]);
        assert_eq!(log.evicted(), 2);
    }

    #[test]
    fn zero_limit_keeps_latest_entry() {
        let mut log = EventLog::with_raw_capacity(0);
        log.push("first");
        log.push("second");
        assert_eq!(log.capacity(), 1);
        assert_eq!(log.iter().copied().collect::<Vec<_>>(), vec!["second"]);
    }

    #[test]
    fn clear_resets_entries_and_counter() {
        let mut log = EventLog::with_raw_capacity(1);
        log.push(1);
        log.push(2);
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.evicted(), 0);
        assert_eq!(log.capacity(), 1);
    }
}
