//! Solver policy for Roster.
//!
//! Business data (days, shifts, roles, submissions) travels with every
//! request. This crate covers the knobs that belong to the operator instead:
//! the time budget, objective weights, search node limit and the hours
//! stamped on each assignment. Documents are TOML or YAML.
//!
//! ```
//! use roster_config::SolverConfig;
//! use std::time::Duration;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     shift_length_hours = 6
//!
//!     [termination]
//!     seconds_spent_limit = 20
//!
//!     [weights]
//!     shortage = 500
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit(), Duration::from_secs(20));
//! assert_eq!(config.weights.shortage, 500);
//! assert_eq!(config.weights.balance, 1000);
//! ```
//!
//! A missing file is not fatal for callers that want defaults:
//!
//! ```
//! use roster_config::SolverConfig;
//!
//! let config = SolverConfig::load("roster.toml").unwrap_or_default();
//! assert_eq!(config.shift_length_hours, 8);
//! ```

use std::path::Path;
use std::time::Duration;

use roster_core::RosterError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Time budget used when no termination is configured.
pub const DEFAULT_TIME_LIMIT_SECS: u64 = 30;

/// Shift length reported on every assignment when not configured.
pub const DEFAULT_SHIFT_LENGTH_HOURS: u32 = 8;

/// Failure to read or accept a solver policy document.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read solver config: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed TOML solver config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("malformed YAML solver config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid solver config: {0}")]
    Invalid(String),
}

/// Serialization format of a policy document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// `.yaml` and `.yml` are YAML; anything else is read as TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                ConfigFormat::Yaml
            }
            _ => ConfigFormat::Toml,
        }
    }
}

impl From<ConfigError> for RosterError {
    fn from(err: ConfigError) -> Self {
        RosterError::Configuration(err.to_string())
    }
}

/// Operator-controlled solve policy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SolverConfig {
    /// Time budget; absent means [`DEFAULT_TIME_LIMIT_SECS`].
    #[serde(default)]
    pub termination: Option<TerminationConfig>,

    /// Objective weights.
    #[serde(default)]
    pub weights: ObjectiveWeights,

    /// Search limits for the backend.
    #[serde(default)]
    pub search: SearchConfig,

    /// Hours reported on each assignment.
    #[serde(default = "default_shift_length")]
    pub shift_length_hours: u32,
}

fn default_shift_length() -> u32 {
    DEFAULT_SHIFT_LENGTH_HOURS
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            termination: None,
            weights: ObjectiveWeights::default(),
            search: SearchConfig::default(),
            shift_length_hours: DEFAULT_SHIFT_LENGTH_HOURS,
        }
    }
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `path`, choosing the format from its extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text, ConfigFormat::from_path(path))
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Self::parse(s, ConfigFormat::Toml)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Self::parse(s, ConfigFormat::Yaml)
    }

    /// Deserializes and validates a policy document.
    pub fn parse(text: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let config: Self = match format {
            ConfigFormat::Toml => toml::from_str(text)?,
            ConfigFormat::Yaml => serde_yaml::from_str(text)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_termination_seconds(mut self, seconds: u64) -> Self {
        self.termination = Some(TerminationConfig {
            seconds_spent_limit: Some(seconds),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Adds to the time budget; combines with any seconds already set.
    pub fn with_termination_millis(mut self, millis: u64) -> Self {
        self.termination = Some(TerminationConfig {
            millis_spent_limit: Some(millis),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Replaces the whole time budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.termination = Some(TerminationConfig {
            millis_spent_limit: Some(u64::try_from(limit.as_millis()).unwrap_or(u64::MAX)),
            ..TerminationConfig::default()
        });
        self
    }

    pub fn with_weights(mut self, weights: ObjectiveWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.search.node_limit = Some(limit);
        self
    }

    pub fn with_shift_length_hours(mut self, hours: u32) -> Self {
        self.shift_length_hours = hours;
        self
    }

    /// Returns the wall-clock budget of a solve.
    ///
    /// Falls back to [`DEFAULT_TIME_LIMIT_SECS`] when no limit is configured.
    pub fn time_limit(&self) -> Duration {
        self.termination
            .as_ref()
            .and_then(|t| t.time_limit())
            .unwrap_or(Duration::from_secs(DEFAULT_TIME_LIMIT_SECS))
    }

    /// Checks semantic constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shift_length_hours == 0 {
            return Err(ConfigError::Invalid(
                "shift_length_hours must be positive".to_string(),
            ));
        }
        if self.search.node_limit == Some(0) {
            return Err(ConfigError::Invalid(
                "search.node_limit must be positive when set".to_string(),
            ));
        }
        if self
            .termination
            .as_ref()
            .is_some_and(|t| t.total_millis().is_none())
        {
            return Err(ConfigError::Invalid(
                "termination budget does not fit in u64 milliseconds".to_string(),
            ));
        }
        if self.weights.balance < 0 || self.weights.shortage < 0 || self.weights.preference < 0 {
            return Err(ConfigError::Invalid(
                "objective weights must be non-negative".to_string(),
            ));
        }
        self.weights.check_ordering();
        Ok(())
    }
}

/// Time budget of one solve. The three fields add up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    pub millis_spent_limit: Option<u64>,
    pub seconds_spent_limit: Option<u64>,
    pub minutes_spent_limit: Option<u64>,
}

impl TerminationConfig {
    /// Total budget in milliseconds, or `None` if it does not fit in a `u64`.
    pub fn total_millis(&self) -> Option<u64> {
        self.millis_spent_limit
            .unwrap_or(0)
            .checked_add(self.seconds_spent_limit.unwrap_or(0).checked_mul(1_000)?)?
            .checked_add(self.minutes_spent_limit.unwrap_or(0).checked_mul(60_000)?)
    }

    /// Total budget, or `None` when it sums to zero.
    ///
    /// A budget too large for [`total_millis`](Self::total_millis) saturates.
    pub fn time_limit(&self) -> Option<Duration> {
        let millis = self.total_millis().unwrap_or(u64::MAX);
        (millis > 0).then(|| Duration::from_millis(millis))
    }
}

/// Weights of the three objective terms.
///
/// Coverage first, fairness second, preference last: the defaults keep
/// `shortage > balance > preference`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ObjectiveWeights {
    pub balance: i64,
    pub shortage: i64,
    pub preference: i64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            balance: 1000,
            shortage: 5000,
            preference: 100,
        }
    }
}

impl ObjectiveWeights {
    pub fn new(balance: i64, shortage: i64, preference: i64) -> Self {
        Self {
            balance,
            shortage,
            preference,
        }
    }

    /// Returns true if weights follow the coverage > fairness > preference ordering.
    pub fn is_conventional(&self) -> bool {
        self.shortage >= self.balance && self.balance >= self.preference
    }

    fn check_ordering(&self) {
        if !self.is_conventional() {
            warn!(
                event = "unusual_weights",
                balance = self.balance,
                shortage = self.shortage,
                preference = self.preference,
                "objective weights do not follow shortage >= balance >= preference"
            );
        }
    }
}

/// Limits handed to the backend besides time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SearchConfig {
    /// Nodes to explore before giving up; unlimited when absent.
    pub node_limit: Option<u64>,
}
