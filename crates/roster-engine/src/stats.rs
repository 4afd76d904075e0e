//! Aggregate statistics over finished schedules.

use std::collections::BTreeMap;

use roster_core::Schedule;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoleTally {
    pub actual: u32,
    /// Assigned plus missing.
    pub required: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterStatistics {
    pub employee_shift_counts: BTreeMap<String, u32>,
    pub roles: BTreeMap<String, RoleTally>,
    /// Mean headcount per shift, one decimal.
    pub average_employees_per_shift: f64,
    /// Shift count per lower-cased label.
    pub shifts_by_type: BTreeMap<String, u32>,
    /// Staffed fraction of required headcount; 1.0 when nothing is required.
    pub coverage: f64,
}

impl RosterStatistics {
    /// Aggregates one or more schedules.
    pub fn from_schedules<'a>(schedules: impl IntoIterator<Item = &'a Schedule>) -> Self {
        let mut stats = Self::default();
        let mut shifts = 0u32;
        let mut headcount = 0u32;

        for schedule in schedules {
            for (_, shift) in schedule.shifts() {
                shifts += 1;
                headcount += shift.employees.len() as u32;

                let label = shift.label.trim().to_lowercase();
                if !label.is_empty() {
                    *stats.shifts_by_type.entry(label).or_insert(0) += 1;
                }

                for assignment in &shift.employees {
                    *stats
                        .employee_shift_counts
                        .entry(assignment.employee_id.clone())
                        .or_insert(0) += 1;
                    let tally = stats.roles.entry(assignment.role.clone()).or_default();
                    tally.actual += 1;
                    tally.required += 1;
                }
                for (role, missing) in &shift.shortages {
                    stats.roles.entry(role.clone()).or_default().required += missing;
                }
            }
        }

        if shifts > 0 {
            let average = f64::from(headcount) / f64::from(shifts);
            stats.average_employees_per_shift = (average * 10.0).round() / 10.0;
        }
        let (actual, required) = stats
            .roles
            .values()
            .fold((0u32, 0u32), |(a, r), t| (a + t.actual, r + t.required));
        stats.coverage = if required == 0 {
            1.0
        } else {
            f64::from(actual) / f64::from(required)
        };
        stats
    }

    pub fn from_schedule(schedule: &Schedule) -> Self {
        Self::from_schedules(std::iter::once(schedule))
    }
}
