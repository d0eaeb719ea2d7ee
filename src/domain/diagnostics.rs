// SPDX-License-Identifier: MPL-2.0
//! How many diagnostic events the session keeps in memory.

/// Number of events retained for export, always between
/// [`BufferCapacity::MIN`] and [`BufferCapacity::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferCapacity(usize);

impl BufferCapacity {
    pub const MIN: usize = 50;
    pub const MAX: usize = 5000;
    pub const DEFAULT: usize = 500;

    /// Out-of-range requests are pulled to the nearest bound.
    #[must_use]
    pub fn new(requested: usize) -> Self {
        Self(requested.clamp(Self::MIN, Self::MAX))
    }

    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }
}

impl Default for BufferCapacity {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}
