//! Roster Core - domain types for shift scheduling
//!
//! This crate provides the vocabulary shared by every other Roster crate:
//! - Schedule configuration and employee submissions as handed over by collaborators
//! - Shift slot addressing (day/shift pairs and their flattened global index)
//! - The structured schedule produced by a solve
//! - The error taxonomy of the scheduling pipeline

pub mod domain;
pub mod error;

pub use domain::{
    AvailabilityEntry, EmployeeSubmission, Schedule, ScheduleConfig, ScheduledDay,
    ScheduledShift, ShiftAssignment, SlotRef, StaffingBounds, MAX_PRIORITY, MIN_PRIORITY,
};
pub use error::{Result, RosterError};
