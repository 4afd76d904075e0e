//! Input normalization.
//!
//! Turns a [`ScheduleConfig`] and the raw employee submissions into a
//! [`SchedulingInput`]: interned roles, per-shift requirements, a flat slot
//! numbering and an `(employee, slot) -> priority` lookup. Every validation
//! failure surfaces here, before any variable is built.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use roster_core::{
    EmployeeSubmission, Result, RosterError, ScheduleConfig, SlotRef, StaffingBounds,
    MAX_PRIORITY, MIN_PRIORITY,
};
use tracing::{debug, info, warn};

/// A role required at a shift type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleRequirement {
    /// Index into [`SchedulingInput::roles`].
    pub role: usize,
    pub required: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEmployee {
    pub identity: String,
    /// Role indices this employee can fill, ascending.
    pub roles: Vec<usize>,
}

impl NormalizedEmployee {
    pub fn holds(&self, role: usize) -> bool {
        self.roles.binary_search(&role).is_ok()
    }
}

/// Canonical, validated scheduling input.
#[derive(Debug, Clone)]
pub struct SchedulingInput {
    pub work_days: Vec<String>,
    pub shift_names: Vec<String>,
    /// Interned role labels, sorted.
    pub roles: Vec<String>,
    /// Importance weight per role index.
    pub importance: Vec<i64>,
    /// Requirements per intra-day shift index.
    pub requirements: Vec<Vec<RoleRequirement>>,
    pub employees: Vec<NormalizedEmployee>,
    pub max_consecutive: usize,
    pub staffing: StaffingBounds,
    availability: BTreeMap<(usize, usize), u8>,
}

impl SchedulingInput {
    pub fn shifts_per_day(&self) -> usize {
        self.shift_names.len()
    }

    pub fn slot_count(&self) -> usize {
        self.work_days.len() * self.shift_names.len()
    }

    pub fn slot_ref(&self, slot: usize) -> SlotRef {
        SlotRef::from_global(slot, self.shifts_per_day())
    }

    /// Requirements that apply at a global slot.
    pub fn requirements_at(&self, slot: usize) -> &[RoleRequirement] {
        &self.requirements[slot % self.shifts_per_day()]
    }

    pub fn required(&self, slot: usize, role: usize) -> u32 {
        self.requirements_at(slot)
            .iter()
            .find(|r| r.role == role)
            .map_or(0, |r| r.required)
    }

    /// Declared priority of an employee for a slot, if available there.
    pub fn priority(&self, employee: usize, slot: usize) -> Option<u8> {
        self.availability.get(&(employee, slot)).copied()
    }

    pub fn is_available(&self, employee: usize, slot: usize) -> bool {
        self.availability.contains_key(&(employee, slot))
    }

    /// Employees that hold `role`, in input order.
    pub fn eligible_employees(&self, role: usize) -> impl Iterator<Item = usize> + '_ {
        self.employees
            .iter()
            .enumerate()
            .filter(move |(_, e)| e.holds(role))
            .map(|(i, _)| i)
    }

    pub fn role_name(&self, role: usize) -> &str {
        &self.roles[role]
    }

    pub fn role_index(&self, name: &str) -> Option<usize> {
        self.roles.binary_search_by(|r| r.as_str().cmp(name)).ok()
    }

    pub fn availability_count(&self) -> usize {
        self.availability.len()
    }
}

fn config_error(msg: impl Into<String>) -> RosterError {
    RosterError::Configuration(msg.into())
}

/// Validates configuration and submissions into a [`SchedulingInput`].
///
/// Inactive submissions are ignored.
pub fn normalize(config: &ScheduleConfig, submissions: &[EmployeeSubmission]) -> Result<SchedulingInput> {
    if config.work_days.is_empty() {
        return Err(config_error("workDays must not be empty"));
    }
    if config.shift_names.is_empty() {
        return Err(config_error("shiftNames must not be empty"));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = config.shift_names.iter().find(|s| !seen.insert(s.as_str())) {
        return Err(config_error(format!("duplicate shift name '{dup}'")));
    }
    if let Some(unknown) = config
        .roles_per_shift
        .keys()
        .find(|label| !config.shift_names.contains(label))
    {
        return Err(RosterError::ModelConstruction(format!(
            "rolesPerShift references undefined shift '{unknown}'"
        )));
    }
    if config.max_consecutive_shifts == 0 {
        return Err(config_error("maxConsecutiveShifts must be at least 1"));
    }
    let staffing = config.min_max_employees_per_shift;
    if staffing.min > staffing.max {
        return Err(config_error(format!(
            "minMaxEmployeesPerShift min {} exceeds max {}",
            staffing.min, staffing.max
        )));
    }

    let roles: Vec<String> = config
        .roles_per_shift
        .values()
        .flat_map(|reqs| reqs.iter().filter(|(_, n)| **n > 0).map(|(r, _)| r.clone()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let mut importance = Vec::with_capacity(roles.len());
    for role in &roles {
        match config.role_importance.get(role) {
            Some(&w) if w > 0 => importance.push(i64::from(w)),
            Some(_) => return Err(config_error(format!("importance of role '{role}' must be positive"))),
            None => return Err(config_error(format!("role '{role}' has no importance weight"))),
        }
    }
    let role_index = |name: &str| roles.binary_search_by(|r| r.as_str().cmp(name)).ok();

    let mut requirements = Vec::with_capacity(config.shift_names.len());
    for label in &config.shift_names {
        let reqs = config
            .requirements_for(label)
            .ok_or_else(|| config_error(format!("shift '{label}' has no rolesPerShift entry")))?;
        requirements.push(
            reqs.iter()
                .filter(|(_, n)| **n > 0)
                .filter_map(|(name, &required)| {
                    role_index(name).map(|role| RoleRequirement { role, required })
                })
                .collect::<Vec<_>>(),
        );
    }

    let shifts_per_day = config.shifts_per_day();
    let mut employees = Vec::new();
    let mut availability = BTreeMap::new();
    let mut identities = HashSet::new();
    for submission in submissions.iter().filter(|s| s.active) {
        let identity = submission.identity.trim();
        if identity.is_empty() {
            return Err(config_error("employee identity must not be empty"));
        }
        if !identities.insert(identity.to_string()) {
            return Err(config_error(format!("duplicate employee '{identity}'")));
        }
        let index = employees.len();

        for entry in &submission.availability {
            if entry.day_index >= config.work_days.len() || entry.shift_index >= shifts_per_day {
                return Err(config_error(format!(
                    "employee '{identity}' declares availability for unknown slot {}",
                    entry.slot()
                )));
            }
            if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&entry.priority) {
                return Err(config_error(format!(
                    "employee '{identity}' priority {} outside {MIN_PRIORITY}..={MAX_PRIORITY}",
                    entry.priority
                )));
            }
            let slot = entry.slot().global(shifts_per_day);
            if let Some(previous) = availability.insert((index, slot), entry.priority) {
                warn!(
                    event = "duplicate_availability",
                    employee = identity,
                    slot,
                    previous,
                    kept = entry.priority,
                );
            }
        }

        let mut held = Vec::new();
        for skill in &submission.skills {
            match role_index(skill) {
                Some(role) => held.push(role),
                None => debug!(event = "unused_skill", employee = identity, skill = %skill),
            }
        }
        held.sort_unstable();

        employees.push(NormalizedEmployee {
            identity: identity.to_string(),
            roles: held,
        });
    }
    if employees.is_empty() {
        return Err(RosterError::NoEmployees);
    }

    let input = SchedulingInput {
        work_days: config.work_days.clone(),
        shift_names: config.shift_names.clone(),
        roles,
        importance,
        requirements,
        employees,
        max_consecutive: config.max_consecutive_shifts as usize,
        staffing,
        availability,
    };
    info!(
        event = "normalize_done",
        slots = input.slot_count(),
        roles = input.roles.len(),
        employees = input.employees.len(),
        availability = input.availability_count(),
    );
    Ok(input)
}
