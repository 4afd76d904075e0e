//! Builders for configurations and submissions.

use std::collections::BTreeMap;

use roster_core::{EmployeeSubmission, ScheduleConfig, StaffingBounds};

/// Starts a configuration with the given day and shift labels.
///
/// Defaults: no roles, `maxConsecutiveShifts = 3`, unbounded staffing.
pub fn config(days: &[&str], shifts: &[&str]) -> ConfigBuilder {
    ConfigBuilder {
        config: ScheduleConfig {
            work_days: days.iter().map(|d| d.to_string()).collect(),
            shift_names: shifts.iter().map(|s| s.to_string()).collect(),
            roles_per_shift: shifts
                .iter()
                .map(|s| (s.to_string(), BTreeMap::new()))
                .collect(),
            role_importance: BTreeMap::new(),
            max_consecutive_shifts: 3,
            min_max_employees_per_shift: StaffingBounds::default(),
        },
    }
}

#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: ScheduleConfig,
}

impl ConfigBuilder {
    /// Requires `count` of `role` at `shift`; importance defaults to 1.
    pub fn role(mut self, shift: &str, role: &str, count: u32) -> Self {
        self.config
            .roles_per_shift
            .entry(shift.to_string())
            .or_default()
            .insert(role.to_string(), count);
        self.config
            .role_importance
            .entry(role.to_string())
            .or_insert(1);
        self
    }

    /// Requires `count` of `role` at every shift.
    pub fn role_everywhere(mut self, role: &str, count: u32) -> Self {
        for shift in self.config.shift_names.clone() {
            self = self.role(&shift, role, count);
        }
        self
    }

    pub fn importance(mut self, role: &str, weight: u32) -> Self {
        self.config.role_importance.insert(role.to_string(), weight);
        self
    }

    pub fn without_importance(mut self, role: &str) -> Self {
        self.config.role_importance.remove(role);
        self
    }

    pub fn max_consecutive(mut self, cap: u32) -> Self {
        self.config.max_consecutive_shifts = cap;
        self
    }

    pub fn staffing(mut self, min: u32, max: u32) -> Self {
        self.config.min_max_employees_per_shift = StaffingBounds { min, max };
        self
    }

    pub fn build(self) -> ScheduleConfig {
        self.config
    }
}

pub fn employee(identity: &str) -> EmployeeBuilder {
    EmployeeBuilder {
        submission: EmployeeSubmission::new(identity),
    }
}

#[derive(Debug, Clone)]
pub struct EmployeeBuilder {
    submission: EmployeeSubmission,
}

impl EmployeeBuilder {
    pub fn skill(mut self, role: &str) -> Self {
        self.submission = self.submission.with_skill(role);
        self
    }

    pub fn available(mut self, day: usize, shift: usize, priority: u8) -> Self {
        self.submission = self.submission.with_availability(day, shift, priority);
        self
    }

    /// Available at every slot of a `days` x `shifts` grid.
    pub fn available_everywhere(mut self, days: usize, shifts: usize, priority: u8) -> Self {
        for day in 0..days {
            for shift in 0..shifts {
                self = self.available(day, shift, priority);
            }
        }
        self
    }

    pub fn build(self) -> EmployeeSubmission {
        self.submission
    }
}
