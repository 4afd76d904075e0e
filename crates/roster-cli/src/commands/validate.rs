use std::path::Path;

use roster_engine::{build_model, normalize};

use super::load_request;

/// Normalizes the request and builds the model, without searching.
pub fn validate(input: &Path) -> anyhow::Result<()> {
    let request = load_request(input)?;
    let normalized = normalize(&request.config, &request.submissions)?;
    let built = build_model(&normalized)?;

    println!("✓ Request is valid");
    println!(
        "  Slots: {} ({} days x {} shifts)",
        normalized.slot_count(),
        normalized.work_days.len(),
        normalized.shifts_per_day()
    );
    println!("  Roles: {}", normalized.roles.join(", "));
    println!("  Employees: {}", normalized.employees.len());
    println!(
        "  Model: {} variables, {} constraints",
        built.stats.variables, built.stats.constraints
    );
    for (family, count) in &built.stats.constraints_by_family {
        println!("    {family}: {count}");
    }
    Ok(())
}
