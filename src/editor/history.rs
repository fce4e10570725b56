// SPDX-License-Identifier: MPL-2.0
//! Bounded linear undo/redo log.
//!
//! Pushing while positioned in the middle of the log drops the redo branch.
//! When the log is full the oldest entry is evicted.

use crate::config::{DEFAULT_HISTORY_SIZE, MAX_HISTORY_SIZE, MIN_HISTORY_SIZE};
use std::collections::VecDeque;

/// Bounded history of snapshots with a cursor.
#[derive(Debug, Clone)]
pub struct HistoryStack<T> {
    entries: VecDeque<T>,
    /// `None` is the empty-stack sentinel.
    position: Option<usize>,
    max_size: usize,
}

impl<T: Clone> Default for HistoryStack<T> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_SIZE)
    }
}

impl<T: Clone> HistoryStack<T> {
    /// Creates an empty stack. `max_size` is clamped to the configured range.
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        let max_size = max_size.clamp(MIN_HISTORY_SIZE, MAX_HISTORY_SIZE);
        Self {
            entries: VecDeque::with_capacity(max_size),
            position: None,
            max_size,
        }
    }

    /// Appends `entry` after the cursor and moves the cursor onto it.
    pub fn push(&mut self, entry: T) {
        if let Some(position) = self.position {
            self.entries.truncate(position + 1);
        }
        self.entries.push_back(entry);
        while self.entries.len() > self.max_size {
            self.entries.pop_front();
        }
        self.position = Some(self.entries.len() - 1);
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.position.is_some_and(|p| p > 0)
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.position.is_some_and(|p| p + 1 < self.entries.len())
    }

    /// Steps back and returns the entry now under the cursor.
    ///
    /// Returns `None` (cursor unchanged) at the oldest entry.
    pub fn undo(&mut self) -> Option<T> {
        if !self.can_undo() {
            return None;
        }
        let position = self.position? - 1;
        self.position = Some(position);
        self.entries.get(position).cloned()
    }

    /// Steps forward and returns the entry now under the cursor.
    ///
    /// Returns `None` (cursor unchanged) at the newest entry.
    pub fn redo(&mut self) -> Option<T> {
        if !self.can_redo() {
            return None;
        }
        let position = self.position? + 1;
        self.position = Some(position);
        self.entries.get(position).cloned()
    }

    /// Entry under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&T> {
        self.entries.get(self.position?)
    }

    /// Clears every entry.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.position = None;
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
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    #[must_use]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }
}
