// SPDX-License-Identifier: MPL-2.0
//! Diagnostics domain types.
//!
//! - [`JournalCapacity`]: how many editor events the diagnostics journal keeps

/// Journal capacity bounds (16 to 4096 events).
pub mod journal_capacity_bounds {
    /// Minimum number of retained events.
    pub const MIN: usize = 16;
    /// Maximum number of retained events.
    pub const MAX: usize = 4096;
    /// Default number of retained events.
    pub const DEFAULT: usize = 256;
}

/// Number of events the diagnostics journal retains before evicting the oldest.
///
/// ```ignore
/// assert_eq!(JournalCapacity::new(1).value(), 16);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JournalCapacity(usize);

impl JournalCapacity {
    /// Creates a new capacity, clamping to the valid range.
    #[must_use]
    pub fn new(value: usize) -> Self {
        Self(value.clamp(journal_capacity_bounds::MIN, journal_capacity_bounds::MAX))
    }

    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }
}

impl Default for JournalCapacity {
    fn default() -> Self {
        Self(journal_capacity_bounds::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn journal_capacity_clamps_both_ends() {
        assert_eq!(JournalCapacity::new(0).value(), journal_capacity_bounds::MIN);
        assert_eq!(
            JournalCapacity::new(1_000_000).value(),
            journal_capacity_bounds::MAX
        );
        assert_eq!(JournalCapacity::new(300).value(), 300);
    }

    #[test]
    fn journal_capacity_default() {
        assert_eq!(
            JournalCapacity::default().value(),
            journal_capacity_bounds::DEFAULT
        );
    }
}
