//! Domain types for shift scheduling.
//!
//! Input side: [`ScheduleConfig`] and [`EmployeeSubmission`], using the
//! camelCase wire names of the configuration and submission collaborators.
//! Output side: [`Schedule`], ordered days of ordered shifts.

mod config;
mod schedule;
mod slot;
mod submission;

pub use config::{ScheduleConfig, StaffingBounds};
pub use schedule::{Schedule, ScheduledDay, ScheduledShift, ShiftAssignment};
pub use slot::SlotRef;
pub use submission::{AvailabilityEntry, EmployeeSubmission, MAX_PRIORITY, MIN_PRIORITY};
