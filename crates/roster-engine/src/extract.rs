//! Result extraction.
//!
//! Reads the solved `(employee, slot, role)` variables back into a
//! [`Schedule`], cross-checking every shortage variable against the realised
//! headcount.

use std::collections::BTreeMap;

use roster_core::{
    Result, RosterError, Schedule, ScheduledDay, ScheduledShift, ShiftAssignment, SlotRef,
};
use tracing::info;

use crate::builder::VariableArena;
use crate::normalize::SchedulingInput;

/// An employee filling a role, with the priority they declared for the slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignedEmployee {
    pub identity: String,
    pub priority: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleCoverage {
    pub role: String,
    pub required: u32,
    pub assigned: Vec<AssignedEmployee>,
}

impl RoleCoverage {
    pub fn filled(&self) -> u32 {
        self.assigned.len() as u32
    }

    pub fn shortage(&self) -> u32 {
        self.required.saturating_sub(self.filled())
    }
}

/// Solved state of one slot, in requirement order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCoverage {
    pub slot: SlotRef,
    pub day: String,
    pub shift: String,
    pub roles: Vec<RoleCoverage>,
}

impl SlotCoverage {
    pub fn has_shortage(&self) -> bool {
        self.roles.iter().any(|r| r.shortage() > 0)
    }
}

#[derive(Debug, Clone)]
pub struct Extraction {
    pub schedule: Schedule,
    pub coverage: Vec<SlotCoverage>,
}

/// Maps solved values to a schedule.
pub fn extract(
    input: &SchedulingInput,
    arena: &VariableArena,
    values: &[i64],
    shift_length_hours: u32,
) -> Result<Extraction> {
    let is_true = |var: roster_solver::VarId| values.get(var.index()).is_some_and(|v| *v != 0);

    // (slot, role) -> employees, in employee order
    let mut filled: BTreeMap<(usize, usize), Vec<usize>> = BTreeMap::new();
    for employee in 0..input.employees.len() {
        for slot in 0..input.slot_count() {
            let mut roles = arena
                .assignments_at(employee, slot)
                .filter(|(_, var)| is_true(*var))
                .map(|(role, _)| role);
            let Some(role) = roles.next() else {
                continue;
            };
            if let Some(other) = roles.next() {
                return Err(RosterError::Internal(format!(
                    "employee '{}' holds roles '{}' and '{}' at slot {slot}",
                    input.employees[employee].identity,
                    input.role_name(role),
                    input.role_name(other),
                )));
            }
            filled.entry((slot, role)).or_default().push(employee);
        }
    }

    let mut days: Vec<ScheduledDay> = input
        .work_days
        .iter()
        .enumerate()
        .map(|(d, name)| ScheduledDay {
            id: format!("d{d}"),
            name: name.clone(),
            shifts: Vec::with_capacity(input.shifts_per_day()),
        })
        .collect();
    let mut coverage = Vec::with_capacity(input.slot_count());

    for slot in 0..input.slot_count() {
        let slot_ref = input.slot_ref(slot);
        let label = &input.shift_names[slot_ref.shift_index];
        let mut shift = ScheduledShift {
            id: format!("s{slot}"),
            label: label.clone(),
            employees: Vec::new(),
            shortages: BTreeMap::new(),
        };
        let mut roles = Vec::new();

        for req in input.requirements_at(slot) {
            let role_name = input.role_name(req.role);
            let assigned = filled.get(&(slot, req.role)).map(Vec::as_slice).unwrap_or(&[]);

            let realised = i64::from(req.required) - assigned.len() as i64;
            let solved = arena
                .shortage(slot, req.role)
                .and_then(|var| values.get(var.index()).copied())
                .unwrap_or(0);
            if realised != solved {
                return Err(RosterError::ExtractionMismatch {
                    slot,
                    role: role_name.to_string(),
                    solved,
                    realised,
                });
            }
            if realised > 0 {
                shift.shortages.insert(role_name.to_string(), realised as u32);
            }

            for &employee in assigned {
                shift.employees.push(ShiftAssignment {
                    id: format!("e{employee}_s{slot}"),
                    employee_id: input.employees[employee].identity.clone(),
                    role: role_name.to_string(),
                    hours: shift_length_hours,
                });
            }
            roles.push(RoleCoverage {
                role: role_name.to_string(),
                required: req.required,
                assigned: assigned
                    .iter()
                    .map(|&e| AssignedEmployee {
                        identity: input.employees[e].identity.clone(),
                        priority: input.priority(e, slot),
                    })
                    .collect(),
            });
        }

        coverage.push(SlotCoverage {
            slot: slot_ref,
            day: input.work_days[slot_ref.day_index].clone(),
            shift: label.clone(),
            roles,
        });
        days[slot_ref.day_index].shifts.push(shift);
    }

    let schedule = Schedule::new(days);
    info!(
        event = "schedule_extracted",
        assignments = schedule.assignment_count(),
        shortage = schedule.total_shortage(),
    );
    Ok(Extraction { schedule, coverage })
}

#[cfg(test)]
mod tests {
    use roster_test::fixtures::{config, employee};

    use super::*;
    use crate::builder::{build_model, BuiltModel};
    use crate::normalize::normalize;

    fn setup() -> (SchedulingInput, BuiltModel) {
        let cfg = config(&["Mon"], &["AM", "PM"])
            .role("AM", "cook", 1)
            .role("AM", "waiter", 2)
            .role("PM", "waiter", 1)
            .build();
        let subs = vec![
            employee("ana").skill("cook").skill("waiter").available(0, 0, 9).build(),
            employee("bo").skill("waiter").available(0, 0, 3).available(0, 1, 7).build(),
        ];
        let input = normalize(&cfg, &subs).unwrap();
        let built = build_model(&input).unwrap();
        (input, built)
    }

    fn set(values: &mut [i64], var: Option<roster_solver::VarId>, value: i64) {
        values[var.unwrap().index()] = value;
    }

    #[test]
    fn test_extracts_roles_and_shortages() {
        let (input, built) = setup();
        let arena = &built.arena;
        let cook = input.role_index("cook").unwrap();
        let waiter = input.role_index("waiter").unwrap();

        let mut values = vec![0; built.model.variable_count()];
        set(&mut values, arena.assignment(0, 0, cook), 1);
        set(&mut values, arena.assignment(1, 0, waiter), 1);
        set(&mut values, arena.assignment(1, 1, waiter), 1);
        set(&mut values, arena.shortage(0, waiter), 1);

        let extraction = extract(&input, arena, &values, 8).unwrap();
        let schedule = &extraction.schedule;

        assert_eq!(schedule.days.len(), 1);
        let am = &schedule.days[0].shifts[0];
        assert_eq!(am.id, "s0");
        assert_eq!(am.label, "AM");
        assert_eq!(am.employees.len(), 2);
        assert_eq!(am.employees[0].employee_id, "ana");
        assert_eq!(am.employees[0].role, "cook");
        assert_eq!(am.employees[0].id, "e0_s0");
        assert_eq!(am.employees[1].hours, 8);
        assert_eq!(am.shortage("waiter"), 1);
        assert!(schedule.days[0].shifts[1].is_fully_staffed());

        let coverage = &extraction.coverage[0];
        assert!(coverage.has_shortage());
        assert_eq!(coverage.roles[1].assigned[0].priority, Some(3));
        assert!(!extraction.coverage[1].has_shortage());
    }

    #[test]
    fn test_shortage_mismatch_is_detected() {
        let (input, built) = setup();
        let waiter = input.role_index("waiter").unwrap();
        let mut values = vec![0; built.model.variable_count()];
        set(&mut values, built.arena.shortage(0, waiter), 1);

        // nobody works, but the cook shortage claims zero
        let err = extract(&input, &built.arena, &values, 8).unwrap_err();
        match err {
            RosterError::ExtractionMismatch {
                slot,
                role,
                solved,
                realised,
            } => {
                assert_eq!((slot, role.as_str(), solved, realised), (0, "cook", 0, 1));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_two_roles_in_one_slot_is_internal_error() {
        let (input, built) = setup();
        let arena = &built.arena;
        let mut values = vec![0; built.model.variable_count()];
        set(&mut values, arena.assignment(0, 0, input.role_index("cook").unwrap()), 1);
        set(&mut values, arena.assignment(0, 0, input.role_index("waiter").unwrap()), 1);

        assert!(matches!(
            extract(&input, arena, &values, 8),
            Err(RosterError::Internal(_))
        ));
    }
}
