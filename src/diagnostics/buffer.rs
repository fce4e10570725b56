// SPDX-License-Identifier: MPL-2.0
//! Bounded storage for the diagnostics journal.

use std::collections::VecDeque;

pub use crate::domain::diagnostics::JournalCapacity;

/// Keeps the newest [`JournalCapacity`] entries, oldest first, and counts
/// what it had to drop so a report can say the journal is incomplete.
///
/// ```
/// use testimonial_editor::diagnostics::{CircularBuffer, JournalCapacity};
///
/// let mut journal = CircularBuffer::new(JournalCapacity::new(16));
/// journal.extend(0..20);
///
/// assert_eq!(journal.iter().next(), Some(&4));
/// assert_eq!(journal.evicted(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct CircularBuffer<T> {
    entries: VecDeque<T>,
    capacity: JournalCapacity,
    evicted: u64,
}

impl<T> CircularBuffer<T> {
    #[must_use]
    pub fn new(capacity: JournalCapacity) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.value()),
            capacity,
            evicted: 0,
        }
    }

    /// Appends `entry`, evicting the oldest once full.
    pub fn push(&mut self, entry: T) {
        if self.entries.len() == self.capacity.value() {
            self.entries.pop_front();
            self.evicted += 1;
        }
        self.entries.push_back(entry);
    }

    /// Appends every entry in order.
    pub fn extend(&mut self, entries: impl IntoIterator<Item = T>) {
        for entry in entries {
            self.push(entry);
        }
    }

    /// Entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity.value()
    }

    /// Entries dropped to make room since creation or the last clear.
    #[must_use]
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Empties the journal and resets the eviction count.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.evicted = 0;
    }
}
