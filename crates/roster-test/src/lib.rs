//! Shared test fixtures for Roster crates.
//!
//! - [`fixtures`] - builders for configurations and employee submissions
//! - [`scenarios`] - ready-made rosters with known optimal properties
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! roster-test = { workspace = true }
//! ```
//!
//! ```ignore
//! use roster_test::fixtures::{config, employee};
//! use roster_test::scenarios::single_employee_everywhere;
//! ```

pub mod fixtures;
pub mod scenarios;

pub use fixtures::{config, employee, ConfigBuilder, EmployeeBuilder};
pub use scenarios::Scenario;
