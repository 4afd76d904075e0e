//! Roster - shift roster optimization
//!
//! Assigns employees to role-bearing shift slots, minimizing unmet coverage,
//! workload imbalance and preference deviation.
//!
//! # Quick Start
//!
//! ```
//! use roster::prelude::*;
//! use roster_test::fixtures::{config, employee};
//!
//! let request = ScheduleRequest::new(
//!     config(&["Mon"], &["AM", "PM"]).role_everywhere("waiter", 1).build(),
//!     vec![employee("dana").skill("waiter").available_everywhere(1, 2, 9).build()],
//! );
//!
//! let outcome = solve_schedule(&request, &SolverConfig::default(), &BranchAndBound::new()).unwrap();
//! let solved = outcome.scheduled().unwrap();
//! assert_eq!(solved.schedule.total_shortage(), 0);
//! ```
//!
//! For request-serving processes, [`SolverService`] runs solves on the Tokio
//! blocking pool and publishes completion notifications.

pub mod pipeline;
pub mod prelude;
pub mod service;

pub use pipeline::{
    limits_for, solve_schedule, NoScheduleReason, NoScheduleReport, ScheduleOutcome,
    ScheduleRequest, SolvedSchedule,
};
pub use service::{JobHandle, JobNotification, JobState, SolverService};

pub use roster_config as config;
pub use roster_core as core;
pub use roster_engine as engine;
pub use roster_solver as solver;
