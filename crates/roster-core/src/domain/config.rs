//! Schedule configuration as supplied by the settings collaborator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Minimum and maximum headcount per shift slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffingBounds {
    pub min: u32,
    pub max: u32,
}

impl Default for StaffingBounds {
    fn default() -> Self {
        Self { min: 0, max: u32::MAX }
    }
}

/// Recurring roster configuration.
///
/// # Examples
///
/// ```
/// use roster_core::ScheduleConfig;
///
/// let config = ScheduleConfig::from_json_str(r#"{
///     "workDays": ["Monday", "Tuesday"],
///     "shiftNames": ["Morning", "Evening"],
///     "rolesPerShift": {
///         "Morning": {"waiter": 2},
///         "Evening": {"waiter": 1, "bartender": 1}
///     },
///     "roleImportance": {"waiter": 3, "bartender": 5},
///     "maxConsecutiveShifts": 2,
///     "minMaxEmployeesPerShift": {"min": 1, "max": 4}
/// }"#).unwrap();
///
/// assert_eq!(config.shifts_per_day(), 2);
/// assert_eq!(config.slot_count(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConfig {
    /// Ordered work-day labels.
    pub work_days: Vec<String>,

    /// Ordered intra-day shift labels; each label is a shift-type.
    pub shift_names: Vec<String>,

    /// Required headcount per role, keyed by shift label.
    pub roles_per_shift: BTreeMap<String, BTreeMap<String, u32>>,

    /// Business importance weight per role.
    pub role_importance: BTreeMap<String, u32>,

    /// Longest run of consecutive occupied slots allowed per employee.
    pub max_consecutive_shifts: u32,

    /// Headcount bounds per slot.
    pub min_max_employees_per_shift: StaffingBounds,
}

impl ScheduleConfig {
    /// Parses configuration from its JSON wire form.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Number of shifts in every work day.
    pub fn shifts_per_day(&self) -> usize {
        self.shift_names.len()
    }

    /// Total number of shift slots across the roster.
    pub fn slot_count(&self) -> usize {
        self.work_days.len() * self.shift_names.len()
    }

    /// Returns the role requirements of a shift label, if defined.
    pub fn requirements_for(&self, shift_label: &str) -> Option<&BTreeMap<String, u32>> {
        self.roles_per_shift.get(shift_label)
    }
}
