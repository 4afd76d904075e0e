//! Model construction.
//!
//! Variables are created in a fixed order (assignments slot-major, then
//! occupancy, shortage and fairness variables) and recorded in a
//! [`VariableArena`]. Constraint families are generated independently from
//! that arena: slot families sequentially, per-employee families in parallel.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;
use roster_core::{Result, RosterError};
use roster_solver::{LinearConstraint, LinearExpr, LinearModel, ModelError, VarId};
use serde::Serialize;
use tracing::{debug, info};

use crate::normalize::SchedulingInput;

pub const ONE_ROLE_PER_SLOT: &str = "one_role_per_slot";
pub const AVAILABILITY: &str = "availability";
pub const COVERAGE: &str = "coverage";
pub const HEADCOUNT: &str = "headcount";
pub const CONSECUTIVE: &str = "consecutive";
pub const WORKLOAD: &str = "workload";
pub const FAIRNESS: &str = "fairness";

/// `(employee, slot, role)` key of an assignment variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssignmentKey {
    pub employee: usize,
    pub slot: usize,
    pub role: usize,
}

impl AssignmentKey {
    pub fn new(employee: usize, slot: usize, role: usize) -> Self {
        Self {
            employee,
            slot,
            role,
        }
    }
}

/// Lookup from domain keys to model variables.
#[derive(Debug, Clone)]
pub struct VariableArena {
    assignments: BTreeMap<AssignmentKey, VarId>,
    occupancy: BTreeMap<(usize, usize), VarId>,
    shortages: BTreeMap<(usize, usize), VarId>,
    totals: Vec<VarId>,
    min_total: VarId,
    max_total: VarId,
}

impl VariableArena {
    pub fn assignment(&self, employee: usize, slot: usize, role: usize) -> Option<VarId> {
        self.assignments
            .get(&AssignmentKey::new(employee, slot, role))
            .copied()
    }

    /// All assignment variables in key order.
    pub fn assignments(&self) -> impl Iterator<Item = (AssignmentKey, VarId)> + '_ {
        self.assignments.iter().map(|(k, v)| (*k, *v))
    }

    /// Role variables of one employee at one slot.
    pub fn assignments_at(&self, employee: usize, slot: usize) -> impl Iterator<Item = (usize, VarId)> + '_ {
        let from = AssignmentKey::new(employee, slot, 0);
        let to = AssignmentKey::new(employee, slot, usize::MAX);
        self.assignments
            .range(from..=to)
            .map(|(k, v)| (k.role, *v))
    }

    /// Occupancy variable; `None` means occupancy is the constant 0.
    pub fn occupancy(&self, employee: usize, slot: usize) -> Option<VarId> {
        self.occupancy.get(&(employee, slot)).copied()
    }

    pub fn occupancies(&self) -> impl Iterator<Item = ((usize, usize), VarId)> + '_ {
        self.occupancy.iter().map(|(k, v)| (*k, *v))
    }

    pub fn shortage(&self, slot: usize, role: usize) -> Option<VarId> {
        self.shortages.get(&(slot, role)).copied()
    }

    pub fn shortages(&self) -> impl Iterator<Item = ((usize, usize), VarId)> + '_ {
        self.shortages.iter().map(|(k, v)| (*k, *v))
    }

    pub fn total(&self, employee: usize) -> Option<VarId> {
        self.totals.get(employee).copied()
    }

    pub fn min_total(&self) -> VarId {
        self.min_total
    }

    pub fn max_total(&self) -> VarId {
        self.max_total
    }
}

/// Size of a built model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelStats {
    pub assignment_variables: usize,
    pub occupancy_variables: usize,
    pub shortage_variables: usize,
    pub variables: usize,
    pub constraints: usize,
    pub constraints_by_family: BTreeMap<String, usize>,
}

/// A model with hard constraints only; the objective is installed separately.
#[derive(Debug, Clone)]
pub struct BuiltModel {
    pub model: LinearModel,
    pub arena: VariableArena,
    pub stats: ModelStats,
}

pub(crate) fn model_error(err: ModelError) -> RosterError {
    RosterError::ModelConstruction(err.to_string())
}

fn slot_bound(input: &SchedulingInput) -> i64 {
    input.slot_count() as i64
}

/// Builds variables and hard constraints for `input`.
pub fn build_model(input: &SchedulingInput) -> Result<BuiltModel> {
    let mut model = LinearModel::new("roster");
    let arena = create_variables(input, &mut model)?;

    let mut constraints = slot_constraints(input, &arena);
    let per_employee: Vec<Vec<LinearConstraint>> = (0..input.employees.len())
        .into_par_iter()
        .map(|employee| employee_constraints(input, &arena, employee))
        .collect();
    constraints.extend(per_employee.into_iter().flatten());
    model.extend_constraints(constraints).map_err(model_error)?;

    let stats = ModelStats {
        assignment_variables: arena.assignments.len(),
        occupancy_variables: arena.occupancy.len(),
        shortage_variables: arena.shortages.len(),
        variables: model.variable_count(),
        constraints: model.constraint_count(),
        constraints_by_family: model.constraint_count_by_family(),
    };
    for (family, count) in &stats.constraints_by_family {
        debug!(event = "constraint_family", family = %family, count);
    }
    info!(
        event = "model_built",
        variables = stats.variables,
        assignments = stats.assignment_variables,
        constraints = stats.constraints,
    );

    Ok(BuiltModel {
        model,
        arena,
        stats,
    })
}

fn create_variables(input: &SchedulingInput, model: &mut LinearModel) -> Result<VariableArena> {
    let mut assignments = BTreeMap::new();
    for slot in 0..input.slot_count() {
        for req in input.requirements_at(slot) {
            let mut candidates: Vec<usize> = input.eligible_employees(req.role).collect();
            candidates.sort_by_key(|&e| Reverse(input.priority(e, slot).unwrap_or(0)));
            for employee in candidates {
                let var = model.new_bool(format!(
                    "assign[{}][{}][{}]",
                    input.employees[employee].identity,
                    slot,
                    input.role_name(req.role)
                ));
                assignments.insert(AssignmentKey::new(employee, slot, req.role), var);
            }
        }
    }

    let pairs: BTreeSet<(usize, usize)> = assignments.keys().map(|k| (k.employee, k.slot)).collect();
    let mut occupancy = BTreeMap::new();
    for (employee, slot) in pairs {
        let var = model.new_bool(format!("occupied[{}][{}]", input.employees[employee].identity, slot));
        occupancy.insert((employee, slot), var);
    }

    let mut shortages = BTreeMap::new();
    for slot in 0..input.slot_count() {
        for req in input.requirements_at(slot) {
            let var = model
                .new_int(
                    format!("shortage[{}][{}]", slot, input.role_name(req.role)),
                    0,
                    i64::from(req.required),
                )
                .map_err(model_error)?;
            shortages.insert((slot, req.role), var);
        }
    }

    let bound = slot_bound(input);
    let totals = input
        .employees
        .iter()
        .map(|e| model.new_int(format!("total[{}]", e.identity), 0, bound))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(model_error)?;
    let min_total = model.new_int("min_total", 0, bound).map_err(model_error)?;
    let max_total = model.new_int("max_total", 0, bound).map_err(model_error)?;

    Ok(VariableArena {
        assignments,
        occupancy,
        shortages,
        totals,
        min_total,
        max_total,
    })
}

/// Coverage and headcount families.
fn slot_constraints(input: &SchedulingInput, arena: &VariableArena) -> Vec<LinearConstraint> {
    let mut constraints = Vec::new();
    for slot in 0..input.slot_count() {
        for req in input.requirements_at(slot) {
            let mut expr: LinearExpr = (0..input.employees.len())
                .filter_map(|e| arena.assignment(e, slot, req.role))
                .map(|var| (var, 1))
                .collect();
            if let Some(shortage) = arena.shortage(slot, req.role) {
                expr.add_term(shortage, 1);
            }
            constraints.push(LinearConstraint::eq(COVERAGE, expr, i64::from(req.required)));
        }

        let present: Vec<VarId> = (0..input.employees.len())
            .filter(|&e| input.is_available(e, slot))
            .filter_map(|e| arena.occupancy(e, slot))
            .collect();
        if !present.is_empty() {
            constraints.push(LinearConstraint::le(
                HEADCOUNT,
                LinearExpr::sum(present),
                i64::from(input.staffing.max),
            ));
        }
    }
    constraints
}

/// Occupancy links, availability gating, consecutive windows and workload
/// totals for one employee.
fn employee_constraints(input: &SchedulingInput, arena: &VariableArena, employee: usize) -> Vec<LinearConstraint> {
    let mut constraints = Vec::new();
    let slots = input.slot_count();

    for slot in 0..slots {
        let Some(occupied) = arena.occupancy(employee, slot) else {
            continue;
        };
        let roles = LinearExpr::sum(arena.assignments_at(employee, slot).map(|(_, var)| var));
        if !input.is_available(employee, slot) {
            constraints.push(LinearConstraint::le(AVAILABILITY, roles.clone(), 0));
        }
        constraints.push(LinearConstraint::eq(
            ONE_ROLE_PER_SLOT,
            LinearExpr::from(occupied) - roles,
            0,
        ));
    }

    let cap = input.max_consecutive;
    for start in 0..slots {
        if start + cap >= slots {
            break;
        }
        let window: Vec<VarId> = (start..=start + cap)
            .filter_map(|slot| arena.occupancy(employee, slot))
            .collect();
        if window.len() > cap {
            constraints.push(LinearConstraint::le(CONSECUTIVE, LinearExpr::sum(window), cap as i64));
        }
    }

    if let Some(total) = arena.total(employee) {
        let worked = LinearExpr::sum((0..slots).filter_map(|slot| arena.occupancy(employee, slot)));
        constraints.push(LinearConstraint::eq(WORKLOAD, LinearExpr::from(total) - worked, 0));
        constraints.push(LinearConstraint::le(
            FAIRNESS,
            LinearExpr::from(total) - LinearExpr::from(arena.max_total),
            0,
        ));
        constraints.push(LinearConstraint::le(
            FAIRNESS,
            LinearExpr::from(arena.min_total) - LinearExpr::from(total),
            0,
        ));
    }
    constraints
}

#[cfg(test)]
mod tests {
    use roster_test::fixtures::{config, employee};

    use super::*;
    use crate::normalize::normalize;

    fn small_input() -> SchedulingInput {
        let cfg = config(&["Mon", "Tue"], &["AM", "PM"])
            .role("AM", "cook", 1)
            .role("AM", "waiter", 1)
            .role("PM", "waiter", 2)
            .max_consecutive(2)
            .staffing(0, 2)
            .build();
        let subs = vec![
            employee("ana").skill("cook").skill("waiter").available(0, 0, 9).available(0, 1, 4).build(),
            employee("bo").skill("waiter").available(0, 1, 8).available(1, 1, 2).build(),
            employee("cy").build(),
        ];
        normalize(&cfg, &subs).unwrap()
    }

    #[test]
    fn test_variables_only_for_eligible_triples() {
        let input = small_input();
        let built = build_model(&input).unwrap();
        let arena = &built.arena;

        // AM slots: ana(cook, waiter) + bo(waiter); PM slots: ana, bo as waiter.
        assert_eq!(built.stats.assignment_variables, 2 * (3 + 2));
        assert!(arena.assignment(0, 0, input.role_index("cook").unwrap()).is_some());
        assert!(arena.assignment(1, 0, input.role_index("cook").unwrap()).is_none());
        assert!(arena.assignment(2, 0, input.role_index("waiter").unwrap()).is_none());
        assert_eq!(arena.assignments_at(0, 0).count(), 2);
        assert!(arena.occupancy(2, 1).is_none());
        assert_eq!(built.stats.shortage_variables, 2 * 2 + 2);
    }

    #[test]
    fn test_family_counts() {
        let input = small_input();
        let built = build_model(&input).unwrap();
        let families = &built.stats.constraints_by_family;

        assert_eq!(families[COVERAGE], 6);
        assert_eq!(families[ONE_ROLE_PER_SLOT], 8);
        // ana: unavailable at slots 2, 3; bo: unavailable at 0, 2.
        assert_eq!(families[AVAILABILITY], 4);
        assert_eq!(families[WORKLOAD], 3);
        assert_eq!(families[FAIRNESS], 6);
        // windows [0, 2] and [1, 3] for ana and bo; cy has no occupancy
        assert_eq!(families[CONSECUTIVE], 4);
        assert_eq!(families[HEADCOUNT], 3);
        assert_eq!(built.stats.constraints, built.model.constraint_count());
    }

    #[test]
    fn test_assignment_order_follows_priority() {
        let input = small_input();
        let built = build_model(&input).unwrap();
        let waiter = input.role_index("waiter").unwrap();

        // slot 1 (Mon PM): bo priority 8 comes before ana priority 4
        let ana = built.arena.assignment(0, 1, waiter).unwrap();
        let bo = built.arena.assignment(1, 1, waiter).unwrap();
        assert!(bo < ana);
    }

    #[test]
    fn test_all_idle_is_feasible() {
        let input = small_input();
        let built = build_model(&input).unwrap();
        let mut values = vec![0; built.model.variable_count()];
        for ((slot, role), var) in built.arena.shortages() {
            values[var.index()] = i64::from(input.required(slot, role));
        }

        assert!(built.model.is_satisfied(&values));
    }
}
