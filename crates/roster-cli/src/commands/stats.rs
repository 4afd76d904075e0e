use std::path::{Path, PathBuf};

use anyhow::Context;
use roster_core::Schedule;
use roster_engine::RosterStatistics;

/// Prints aggregate statistics for saved schedules.
///
/// Accepts either bare schedules or documents written by `solve`.
pub fn stats(paths: &[PathBuf]) -> anyhow::Result<()> {
    let schedules = paths
        .iter()
        .map(|path| load_schedule(path))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let statistics = RosterStatistics::from_schedules(&schedules);
    println!("{}", serde_json::to_string_pretty(&statistics)?);
    Ok(())
}

fn load_schedule(path: &Path) -> anyhow::Result<Schedule> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let mut value: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("invalid JSON in {}", path.display()))?;
    if let Some(schedule) = value.get_mut("schedule") {
        value = schedule.take();
    }
    serde_json::from_value(value).with_context(|| format!("not a schedule: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use roster::prelude::*;
    use roster_test::scenarios;

    use super::*;

    #[test]
    fn test_load_schedule_accepts_bare_and_wrapped() {
        let scenario = scenarios::single_employee_everywhere();
        let request = ScheduleRequest::new(scenario.config, scenario.submissions);
        let outcome = solve_schedule(&request, &SolverConfig::default(), &BranchAndBound::new()).unwrap();
        let schedule = outcome.scheduled().unwrap().schedule.clone();

        let dir = tempfile::tempdir().unwrap();
        let bare = dir.path().join("bare.json");
        let wrapped = dir.path().join("wrapped.json");
        std::fs::write(&bare, serde_json::to_string(&schedule).unwrap()).unwrap();
        std::fs::write(
            &wrapped,
            serde_json::json!({ "schedule": schedule, "objective": 0 }).to_string(),
        )
        .unwrap();

        assert_eq!(load_schedule(&bare).unwrap(), schedule);
        assert_eq!(load_schedule(&wrapped).unwrap(), schedule);
        stats(&[bare, wrapped]).unwrap();
    }
}
