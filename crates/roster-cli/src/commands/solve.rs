use std::path::Path;

use anyhow::{bail, Context};
use roster::solver::BranchAndBound;
use roster::{solve_schedule, ScheduleOutcome, SolvedSchedule};
use roster_config::SolverConfig;
use serde_json::{json, Value};
use tracing::info;

use super::load_request;

pub fn solve(
    input: &Path,
    config: &SolverConfig,
    narrative: bool,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let request = load_request(input)?;
    info!(
        event = "request_loaded",
        path = %input.display(),
        employees = request.submissions.len(),
        time_limit_ms = config.time_limit().as_millis() as u64,
    );
    let outcome = solve_schedule(&request, config, &BranchAndBound::new())?;

    let solved = match outcome {
        ScheduleOutcome::Scheduled(solved) => solved,
        ScheduleOutcome::NoSchedule(report) => {
            eprintln!("⚠ No schedule: {}", report.hint);
            eprintln!("  Nodes explored: {}", report.nodes_explored);
            bail!("solver budget exhausted before any schedule was found");
        }
    };

    if narrative {
        println!("{}", solved.narrative.join("\n\n"));
    }

    let document = result_document(&solved)?;
    let text = serde_json::to_string_pretty(&document)?;
    match output {
        Some(path) => {
            std::fs::write(path, text).with_context(|| format!("cannot write {}", path.display()))?;
            eprintln!(
                "✓ Schedule written to {} ({}, shortage {})",
                path.display(),
                solved.quality,
                solved.schedule.total_shortage()
            );
        }
        None if !narrative => println!("{text}"),
        None => {}
    }
    Ok(())
}

fn result_document(solved: &SolvedSchedule) -> anyhow::Result<Value> {
    Ok(json!({
        "schedule": serde_json::to_value(&solved.schedule)?,
        "quality": solved.quality,
        "objective": solved.objective,
        "breakdown": serde_json::to_value(solved.breakdown)?,
        "model": serde_json::to_value(&solved.model_stats)?,
        "search": {
            "nodes": solved.statistics.nodes,
            "solutions": solved.statistics.solutions,
            "elapsedMs": solved.statistics.elapsed.as_millis() as u64,
            "termination": solved.statistics.termination.to_string(),
        },
    }))
}
