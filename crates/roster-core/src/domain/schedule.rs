//! The structured schedule handed to persistence and notification collaborators.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::SlotRef;

/// One employee holding one role in one shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftAssignment {
    /// Unique per employee and slot, e.g. `e3_s7`.
    pub id: String,
    pub employee_id: String,
    pub role: String,
    pub hours: u32,
}

/// A staffed (or short-staffed) shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledShift {
    /// Global slot id, e.g. `s7`.
    pub id: String,
    #[serde(alias = "time")]
    pub label: String,
    pub employees: Vec<ShiftAssignment>,
    /// Missing headcount per role; empty when fully staffed.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub shortages: BTreeMap<String, u32>,
}

impl ScheduledShift {
    pub fn is_fully_staffed(&self) -> bool {
        self.shortages.is_empty()
    }

    /// Number of employees assigned to `role`.
    pub fn assigned_count(&self, role: &str) -> usize {
        self.employees.iter().filter(|a| a.role == role).count()
    }

    pub fn shortage(&self, role: &str) -> u32 {
        self.shortages.get(role).copied().unwrap_or(0)
    }

    pub fn is_assigned(&self, employee_id: &str) -> bool {
        self.employees.iter().any(|a| a.employee_id == employee_id)
    }
}

/// A work day and its ordered shifts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledDay {
    /// Day id, e.g. `d2`.
    pub id: String,
    pub name: String,
    pub shifts: Vec<ScheduledShift>,
}

/// Ordered work days, each with ordered shifts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub days: Vec<ScheduledDay>,
}

impl Schedule {
    pub fn new(days: Vec<ScheduledDay>) -> Self {
        Self { days }
    }

    /// Returns the shift at `slot`, if it exists.
    pub fn shift(&self, slot: SlotRef) -> Option<&ScheduledShift> {
        self.days
            .get(slot.day_index)
            .and_then(|day| day.shifts.get(slot.shift_index))
    }

    /// Iterates shifts in chronological order with their slot.
    pub fn shifts(&self) -> impl Iterator<Item = (SlotRef, &ScheduledShift)> {
        self.days.iter().enumerate().flat_map(|(d, day)| {
            day.shifts
                .iter()
                .enumerate()
                .map(move |(s, shift)| (SlotRef::new(d, s), shift))
        })
    }

    /// Iterates every assignment with its slot.
    pub fn assignments(&self) -> impl Iterator<Item = (SlotRef, &ShiftAssignment)> {
        self.shifts()
            .flat_map(|(slot, shift)| shift.employees.iter().map(move |a| (slot, a)))
    }

    pub fn shift_count(&self) -> usize {
        self.days.iter().map(|d| d.shifts.len()).sum()
    }

    pub fn assignment_count(&self) -> usize {
        self.assignments().count()
    }

    /// Sum of missing headcount over all shifts and roles.
    pub fn total_shortage(&self) -> u32 {
        self.shifts()
            .flat_map(|(_, shift)| shift.shortages.values())
            .sum()
    }

    /// Slots occupied by `employee_id`, in chronological order.
    pub fn slots_of(&self, employee_id: &str) -> Vec<SlotRef> {
        self.assignments()
            .filter(|(_, a)| a.employee_id == employee_id)
            .map(|(slot, _)| slot)
            .collect()
    }
}
