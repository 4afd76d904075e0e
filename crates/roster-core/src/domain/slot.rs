//! Shift slot addressing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A shift slot identified by work-day and intra-day shift index.
///
/// Slots flatten to a global index `day_index * shifts_per_day + shift_index`,
/// which orders the whole roster chronologically.
///
/// # Examples
///
/// ```
/// use roster_core::SlotRef;
///
/// let slot = SlotRef::new(2, 1);
/// assert_eq!(slot.global(3), 7);
/// assert_eq!(SlotRef::from_global(7, 3), slot);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRef {
    pub day_index: usize,
    pub shift_index: usize,
}

impl SlotRef {
    pub fn new(day_index: usize, shift_index: usize) -> Self {
        Self {
            day_index,
            shift_index,
        }
    }

    /// Flattens to the global slot index.
    pub fn global(&self, shifts_per_day: usize) -> usize {
        self.day_index * shifts_per_day + self.shift_index
    }

    /// Recovers the slot from a global index.
    pub fn from_global(index: usize, shifts_per_day: usize) -> Self {
        Self::new(index / shifts_per_day, index % shifts_per_day)
    }
}

impl fmt::Display for SlotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}/s{}", self.day_index, self.shift_index)
    }
}
