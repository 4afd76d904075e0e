//! Invariant checks shared by the integration tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};

use roster::prelude::*;
use roster_test::Scenario;

pub fn request(scenario: Scenario) -> ScheduleRequest {
    ScheduleRequest::new(scenario.config, scenario.submissions)
}

pub fn solve(request: &ScheduleRequest, config: &SolverConfig) -> SolvedSchedule {
    match solve_schedule(request, config, &BranchAndBound::new()).expect("pipeline") {
        ScheduleOutcome::Scheduled(solved) => solved,
        ScheduleOutcome::NoSchedule(report) => panic!("no schedule: {}", report.hint),
    }
}

/// Global slot indices an employee occupies.
pub fn occupied(schedule: &Schedule, employee: &str, shifts_per_day: usize) -> BTreeSet<usize> {
    schedule
        .slots_of(employee)
        .into_iter()
        .map(|slot| slot.global(shifts_per_day))
        .collect()
}

/// Asserts every hard invariant of a solved schedule against its request.
pub fn assert_invariants(request: &ScheduleRequest, schedule: &Schedule) {
    let config = &request.config;
    let spd = config.shifts_per_day();
    let slots = config.slot_count();
    let active: BTreeMap<&str, &EmployeeSubmission> = request
        .submissions
        .iter()
        .filter(|s| s.active)
        .map(|s| (s.identity.as_str(), s))
        .collect();

    assert_eq!(schedule.shift_count(), slots);

    for (slot, shift) in schedule.shifts() {
        let label = &config.shift_names[slot.shift_index];
        assert_eq!(&shift.label, label);

        // one role per employee per slot
        let mut seen = BTreeSet::new();
        for assignment in &shift.employees {
            assert!(
                seen.insert(assignment.employee_id.as_str()),
                "{} holds two roles at {slot}",
                assignment.employee_id
            );
            let submission = active[assignment.employee_id.as_str()];
            assert!(submission.has_skill(&assignment.role), "unskilled assignment at {slot}");
            assert!(
                submission
                    .availability
                    .iter()
                    .any(|a| a.slot() == slot),
                "{} assigned outside availability at {slot}",
                assignment.employee_id
            );
        }

        // coverage identity
        for (role, &required) in &config.roles_per_shift[label] {
            if required == 0 {
                continue;
            }
            let assigned = shift.assigned_count(role) as u32;
            assert_eq!(assigned + shift.shortage(role), required, "coverage of {role} at {slot}");
        }
    }

    // consecutive windows
    let cap = config.max_consecutive_shifts as usize;
    for identity in active.keys() {
        let worked = occupied(schedule, identity, spd);
        for start in 0..slots {
            if start + cap >= slots {
                break;
            }
            let in_window = (start..=start + cap).filter(|s| worked.contains(s)).count();
            assert!(in_window <= cap, "{identity} works {in_window} of window at {start}");
        }
    }

    // headcount cap
    let max = config.min_max_employees_per_shift.max as usize;
    for (slot, shift) in schedule.shifts() {
        assert!(shift.employees.len() <= max, "headcount exceeded at {slot}");
    }
}
