//! Per-slot text summaries for people reading the roster.

use crate::extract::{RoleCoverage, SlotCoverage};

const RULE_WIDTH: usize = 30;

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn status_line(role: &RoleCoverage) -> String {
    let status = match role.shortage() {
        0 => "✓ FULL".to_string(),
        missing => format!("⚠ SHORTAGE: Missing {missing}"),
    };
    format!(
        "  {}: {} ({}/{} filled)",
        capitalize(&role.role),
        status,
        role.filled(),
        role.required
    )
}

/// Renders one slot.
///
/// ```text
/// MONDAY - MORNING
/// ==============================
/// Required Roles:
///   • Waiter: 2 needed
///
/// Assigned Employees by Role:
///   Waiter:
///     ✓ Dana (Priority: 9/10)
///
/// Staffing Status:
///   Waiter: ⚠ SHORTAGE: Missing 1 (1/2 filled)
///
/// ⚠ WARNING: This shift has staffing shortages!
/// ```
pub fn render_slot(coverage: &SlotCoverage) -> String {
    let mut lines = vec![
        format!("{} - {}", coverage.day.to_uppercase(), coverage.shift.to_uppercase()),
        "=".repeat(RULE_WIDTH),
        "Required Roles:".to_string(),
    ];
    for role in &coverage.roles {
        lines.push(format!("  • {}: {} needed", capitalize(&role.role), role.required));
    }

    lines.push(String::new());
    lines.push("Assigned Employees by Role:".to_string());
    for role in &coverage.roles {
        lines.push(format!("  {}:", capitalize(&role.role)));
        if role.assigned.is_empty() {
            lines.push("    ⚠ No employees assigned".to_string());
            continue;
        }
        let mut assigned: Vec<_> = role.assigned.iter().collect();
        assigned.sort_by(|a, b| a.identity.cmp(&b.identity));
        for employee in assigned {
            lines.push(format!(
                "    ✓ {} (Priority: {}/10)",
                employee.identity,
                employee.priority.unwrap_or(0)
            ));
        }
    }

    lines.push(String::new());
    lines.push("Staffing Status:".to_string());
    let mut statuses: Vec<&RoleCoverage> = coverage.roles.iter().collect();
    statuses.sort_by_key(|role| role.shortage() == 0);
    lines.extend(statuses.into_iter().map(status_line));

    lines.push(String::new());
    if coverage.has_shortage() {
        lines.push("⚠ WARNING: This shift has staffing shortages!".to_string());
    } else {
        lines.push("✓ All positions are properly filled for this shift".to_string());
    }
    lines.join("\n")
}

/// Renders every slot in schedule order.
pub fn render(coverage: &[SlotCoverage]) -> Vec<String> {
    coverage.iter().map(render_slot).collect()
}

#[cfg(test)]
mod tests {
    use roster_core::SlotRef;

    use super::*;
    use crate::extract::AssignedEmployee;

    fn assigned(identity: &str, priority: Option<u8>) -> AssignedEmployee {
        AssignedEmployee {
            identity: identity.to_string(),
            priority,
        }
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("waiter"), "Waiter");
        assert_eq!(capitalize("HEAD chef"), "Head chef");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_short_staffed_slot() {
        let coverage = SlotCoverage {
            slot: SlotRef::new(0, 0),
            day: "Monday".into(),
            shift: "Morning".into(),
            roles: vec![
                RoleCoverage {
                    role: "cook".into(),
                    required: 1,
                    assigned: vec![assigned("Eli", Some(5))],
                },
                RoleCoverage {
                    role: "waiter".into(),
                    required: 2,
                    assigned: vec![assigned("Dana", Some(9))],
                },
                RoleCoverage {
                    role: "host".into(),
                    required: 1,
                    assigned: vec![],
                },
            ],
        };

        let expected = "\
MONDAY - MORNING
==============================
Required Roles:
  • Cook: 1 needed
  • Waiter: 2 needed
  • Host: 1 needed

Assigned Employees by Role:
  Cook:
    ✓ Eli (Priority: 5/10)
  Waiter:
    ✓ Dana (Priority: 9/10)
  Host:
    ⚠ No employees assigned

Staffing Status:
  Waiter: ⚠ SHORTAGE: Missing 1 (1/2 filled)
  Host: ⚠ SHORTAGE: Missing 1 (0/1 filled)
  Cook: ✓ FULL (1/1 filled)

⚠ WARNING: This shift has staffing shortages!";
        assert_eq!(render_slot(&coverage), expected);
    }

    #[test]
    fn test_fully_staffed_slot_sorts_assignees() {
        let coverage = SlotCoverage {
            slot: SlotRef::new(1, 0),
            day: "tue".into(),
            shift: "pm".into(),
            roles: vec![RoleCoverage {
                role: "waiter".into(),
                required: 2,
                assigned: vec![assigned("Zoe", None), assigned("Avi", Some(10))],
            }],
        };

        let text = render_slot(&coverage);
        let avi = text.find("✓ Avi (Priority: 10/10)").unwrap();
        let zoe = text.find("✓ Zoe (Priority: 0/10)").unwrap();
        assert!(avi < zoe);
        assert!(text.starts_with("TUE - PM\n"));
        assert!(text.ends_with("✓ All positions are properly filled for this shift"));
        assert_eq!(render(&[coverage.clone(), coverage]).len(), 2);
    }
}
