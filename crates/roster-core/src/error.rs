//! Error types for the scheduling pipeline

use thiserror::Error;

/// Main error type for Roster operations.
///
/// A solve that runs out of time without any feasible schedule is not an
/// error; it is reported as a structured outcome by the pipeline.
#[derive(Debug, Error)]
pub enum RosterError {
    /// Missing or malformed configuration or submission data
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The candidate pool is empty after filtering inactive submissions
    #[error("No employees available for scheduling")]
    NoEmployees,

    /// An internal invariant of model construction was violated
    #[error("Model construction error: {0}")]
    ModelConstruction(String),

    /// The backend proved the model infeasible.
    ///
    /// Shortage slack makes every model feasible, so this is a modeling defect.
    #[error("Solver proved the model infeasible after exploring {nodes} nodes")]
    SolverInternalInfeasible { nodes: u64 },

    /// The solved shortage disagrees with the recomputed one
    #[error(
        "Extraction mismatch at slot {slot} for role '{role}': solved shortage {solved}, realised {realised}"
    )]
    ExtractionMismatch {
        slot: usize,
        role: String,
        solved: i64,
        realised: i64,
    },

    /// Solve was cancelled before completion
    #[error("Solve was cancelled")]
    Cancelled,

    /// Internal error (should not occur in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RosterError {
    /// Returns true for errors caused by the caller's input.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            RosterError::Configuration(_)
                | RosterError::NoEmployees
                | RosterError::ModelConstruction(_)
        )
    }
}

impl From<serde_json::Error> for RosterError {
    fn from(err: serde_json::Error) -> Self {
        RosterError::Configuration(format!("malformed input: {err}"))
    }
}

/// Result type alias for Roster operations
pub type Result<T> = std::result::Result<T, RosterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors() {
        assert!(RosterError::Configuration("x".into()).is_input_error());
        assert!(RosterError::NoEmployees.is_input_error());
        assert!(RosterError::ModelConstruction("x".into()).is_input_error());
        assert!(!RosterError::SolverInternalInfeasible { nodes: 3 }.is_input_error());
        assert!(!RosterError::Cancelled.is_input_error());
    }

    #[test]
    fn test_json_error_maps_to_configuration() {
        let err: RosterError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, RosterError::Configuration(msg) if msg.starts_with("malformed input")));
    }

    #[test]
    fn test_display() {
        let err = RosterError::ExtractionMismatch {
            slot: 4,
            role: "waiter".into(),
            solved: 1,
            realised: 0,
        };
        assert_eq!(
            err.to_string(),
            "Extraction mismatch at slot 4 for role 'waiter': solved shortage 1, realised 0"
        );
    }
}
