// SPDX-License-Identifier: MPL-2.0
//! Request sequencing.
//!
//! Each submit takes a new [`RequestId`]. A response is only applied when it
//! carries the latest id; anything older has been superseded by a newer
//! submit, a retry or a reset and is dropped.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: u64,
}

impl RequestSequencer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next id, superseding every earlier one.
    pub fn issue(&mut self) -> RequestId {
        self.latest += 1;
        RequestId(self.latest)
    }

    #[must_use]
    pub fn is_current(&self, id: RequestId) -> bool {
        id.0 == self.latest
    }

    /// Supersedes all outstanding ids without issuing a new one.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_increase_monotonically() {
        let mut sequencer = RequestSequencer::new();
        let a = sequencer.issue();
        let b = sequencer.issue();
        assert!(b > a);
        assert_eq!(b.value(), a.value() + 1);
    }

    #[test]
    fn only_latest_id_is_current() {
        let mut sequencer = RequestSequencer::new();
        let first = sequencer.issue();
        assert!(sequencer.is_current(first));

        let second = sequencer.issue();
        assert!(!sequencer.is_current(first));
        assert!(sequencer.is_current(second));
    }

    #[test]
    fn invalidate_supersedes_outstanding_request() {
        let mut sequencer = RequestSequencer::new();
        let id = sequencer.issue();
        sequencer.invalidate();
        assert!(!sequencer.is_current(id));

        let next = sequencer.issue();
        assert!(sequencer.is_current(next));
    }
}
