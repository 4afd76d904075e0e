//! Per-employee submissions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::SlotRef;
use crate::error::Result;

/// Lowest declarable availability priority.
pub const MIN_PRIORITY: u8 = 1;

/// Highest declarable availability priority.
pub const MAX_PRIORITY: u8 = 10;

/// A declared availability for one slot with its preference strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityEntry {
    pub day_index: usize,
    pub shift_index: usize,
    /// Preference strength, 1 (low) to 10 (high).
    pub priority: u8,
}

impl AvailabilityEntry {
    pub fn new(day_index: usize, shift_index: usize, priority: u8) -> Self {
        Self {
            day_index,
            shift_index,
            priority,
        }
    }

    pub fn slot(&self) -> SlotRef {
        SlotRef::new(self.day_index, self.shift_index)
    }
}

fn default_active() -> bool {
    true
}

/// An employee's skills and declared availability for the coming roster.
///
/// # Examples
///
/// ```
/// use roster_core::EmployeeSubmission;
///
/// let submission = EmployeeSubmission::from_json_str(r#"{
///     "identity": "Dana Levi",
///     "skills": ["waiter"],
///     "availability": [{"dayIndex": 0, "shiftIndex": 1, "priority": 8}]
/// }"#).unwrap();
///
/// assert!(submission.active);
/// assert!(submission.has_skill("waiter"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSubmission {
    #[serde(alias = "id")]
    pub identity: String,

    /// Role labels this employee may fill.
    #[serde(default)]
    pub skills: BTreeSet<String>,

    #[serde(default)]
    pub availability: Vec<AvailabilityEntry>,

    /// Inactive submissions are ignored when building a roster.
    #[serde(default = "default_active")]
    pub active: bool,
}

impl EmployeeSubmission {
    /// Creates an active submission without skills or availability.
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            skills: BTreeSet::new(),
            availability: Vec::new(),
            active: true,
        }
    }

    /// Parses a submission from its JSON wire form.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn with_skill(mut self, role: impl Into<String>) -> Self {
        self.skills.insert(role.into());
        self
    }

    pub fn with_availability(mut self, day_index: usize, shift_index: usize, priority: u8) -> Self {
        self.availability
            .push(AvailabilityEntry::new(day_index, shift_index, priority));
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn has_skill(&self, role: &str) -> bool {
        self.skills.contains(role)
    }
}
