//! Commonly used types.

pub use crate::pipeline::{
    solve_schedule, NoScheduleReport, ScheduleOutcome, ScheduleRequest, SolvedSchedule,
};
pub use crate::service::{JobNotification, JobState, SolverService};
pub use roster_config::{ObjectiveWeights, SolverConfig};
pub use roster_core::{
    EmployeeSubmission, Result, RosterError, Schedule, ScheduleConfig, SlotRef, StaffingBounds,
};
pub use roster_engine::{ObjectiveBreakdown, RosterStatistics, SolveQuality};
pub use roster_solver::{Backend, BranchAndBound};
