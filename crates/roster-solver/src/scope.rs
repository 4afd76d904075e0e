//! Search-level scope shared by terminations and the search loop.

use std::time::{Duration, Instant};

/// Tracks progress of a single search.
#[derive(Debug, Clone, Default)]
pub struct SearchScope {
    start_time: Option<Instant>,
    node_count: u64,
    solution_count: u64,
    best_objective: Option<i64>,
}

impl SearchScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the start of solving.
    pub fn start_solving(&mut self) {
        self.start_time = Some(Instant::now());
        self.node_count = 0;
        self.solution_count = 0;
        self.best_objective = None;
    }

    pub fn start_time(&self) -> Option<Instant> {
        self.start_time
    }

    /// Elapsed time since solving started.
    pub fn elapsed(&self) -> Option<Duration> {
        self.start_time.map(|t| t.elapsed())
    }

    pub fn increment_node_count(&mut self) {
        self.node_count += 1;
    }

    pub fn node_count(&self) -> u64 {
        self.node_count
    }

    /// Records a new incumbent.
    pub fn record_solution(&mut self, objective: i64) {
        self.solution_count += 1;
        self.best_objective = Some(objective);
    }

    pub fn solution_count(&self) -> u64 {
        self.solution_count
    }

    pub fn best_objective(&self) -> Option<i64> {
        self.best_objective
    }
}
