use std::path::Path;

use anyhow::Context;
use roster::ScheduleRequest;
use roster_config::SolverConfig;

pub mod solve;
pub mod stats;
pub mod validate;

/// Reads a request file.
pub fn load_request(path: &Path) -> anyhow::Result<ScheduleRequest> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    ScheduleRequest::from_json_str(&contents)
        .with_context(|| format!("invalid request in {}", path.display()))
}

/// Loads solver settings; no path means defaults.
pub fn load_solver_config(path: Option<&Path>) -> anyhow::Result<SolverConfig> {
    match path {
        Some(path) => SolverConfig::load(path)
            .with_context(|| format!("cannot load solver config {}", path.display())),
        None => Ok(SolverConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use roster::ScheduleRequest;
    use roster_test::scenarios;

    use super::*;

    pub(crate) fn write_request(dir: &Path, scenario: roster_test::Scenario) -> std::path::PathBuf {
        let path = dir.join("request.json");
        let request = ScheduleRequest::new(scenario.config, scenario.submissions);
        fs::write(&path, serde_json::to_string(&request).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_config_format_follows_extension() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("solver.yml");
        let toml = dir.path().join("solver.toml");
        fs::write(&yaml, "termination:\n  seconds_spent_limit: 5\n").unwrap();
        fs::write(&toml, "[termination]\nseconds_spent_limit = 7\n").unwrap();

        let from_yaml = load_solver_config(Some(&yaml)).unwrap();
        let from_toml = load_solver_config(Some(&toml)).unwrap();

        assert_eq!(from_yaml.time_limit().as_secs(), 5);
        assert_eq!(from_toml.time_limit().as_secs(), 7);
    }

    #[test]
    fn test_missing_config_path_uses_defaults() {
        assert_eq!(load_solver_config(None).unwrap(), SolverConfig::default());
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_solver_config(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn test_load_request_reads_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_request(dir.path(), scenarios::consecutive_cap());

        let request = load_request(&path).unwrap();
        assert_eq!(request.submissions.len(), 1);
        assert_eq!(request.config.slot_count(), 4);
    }
}
