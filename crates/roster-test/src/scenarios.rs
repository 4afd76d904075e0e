//! Reference rosters.

use roster_core::{EmployeeSubmission, ScheduleConfig};

use crate::fixtures::{config, employee};

/// A named configuration with its submissions.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: &'static str,
    pub config: ScheduleConfig,
    pub submissions: Vec<EmployeeSubmission>,
}

/// One employee, one role required everywhere, full availability, one
/// person per slot. Every slot gets filled.
pub fn single_employee_everywhere() -> Scenario {
    Scenario {
        name: "single-employee-everywhere",
        config: config(&["Mon", "Tue"], &["AM", "PM"])
            .role_everywhere("waiter", 1)
            .max_consecutive(4)
            .staffing(0, 1)
            .build(),
        submissions: vec![employee("ana").skill("waiter").available_everywhere(2, 2, 8).build()],
    }
}

/// `chef` is required everywhere but nobody holds it.
pub fn role_without_candidates() -> Scenario {
    Scenario {
        name: "role-without-candidates",
        config: config(&["Mon", "Tue"], &["AM", "PM"])
            .role_everywhere("waiter", 1)
            .role_everywhere("chef", 1)
            .importance("chef", 5)
            .max_consecutive(4)
            .build(),
        submissions: vec![employee("ana").skill("waiter").available_everywhere(2, 2, 6).build()],
    }
}

/// One employee, two back-to-back slots, only one can be worked. Slot 0 is
/// preferred (priority 10) over slot 1 (priority 1).
pub fn preference_decides() -> Scenario {
    Scenario {
        name: "preference-decides",
        config: config(&["Mon"], &["X", "Y"])
            .role_everywhere("waiter", 1)
            .max_consecutive(1)
            .staffing(0, 1)
            .build(),
        submissions: vec![employee("ana")
            .skill("waiter")
            .available(0, 0, 10)
            .available(0, 1, 1)
            .build()],
    }
}

/// Four consecutive slots, one eligible employee, at most two in a row.
pub fn consecutive_cap() -> Scenario {
    Scenario {
        name: "consecutive-cap",
        config: config(&["Mon"], &["S1", "S2", "S3", "S4"])
            .role_everywhere("guard", 1)
            .max_consecutive(2)
            .build(),
        submissions: vec![employee("ana").skill("guard").available_everywhere(1, 4, 5).build()],
    }
}

/// A restaurant-sized week: 3 days x 2 shifts, three roles, five employees
/// with mixed skills and availability.
pub fn restaurant_days() -> Scenario {
    let days = ["Sun", "Mon", "Tue"];
    let shifts = ["Morning", "Evening"];
    let cfg = config(&days, &shifts)
        .role("Morning", "waiter", 2)
        .role("Morning", "cook", 1)
        .role("Evening", "waiter", 2)
        .role("Evening", "cook", 1)
        .role("Evening", "manager", 1)
        .importance("manager", 3)
        .importance("cook", 2)
        .max_consecutive(2)
        .staffing(1, 4)
        .build();

    let people: [(&str, &[&str]); 5] = [
        ("dana", &["waiter", "manager"]),
        ("eli", &["cook"]),
        ("noa", &["waiter"]),
        ("omer", &["waiter", "cook"]),
        ("tal", &["manager", "waiter"]),
    ];
    let submissions = people
        .iter()
        .enumerate()
        .map(|(i, (name, skills))| {
            let mut builder = skills.iter().fold(employee(name), |b, s| b.skill(s));
            for day in 0..days.len() {
                for shift in 0..shifts.len() {
                    if (i + day + shift) % 4 != 3 {
                        let priority = 1 + ((i * 7 + day * 3 + shift * 5) % 10) as u8;
                        builder = builder.available(day, shift, priority);
                    }
                }
            }
            builder.build()
        })
        .collect();

    Scenario {
        name: "restaurant-days",
        config: cfg,
        submissions,
    }
}

/// A full week with three shifts a day; large enough that exhaustive search
/// rarely finishes within a short budget.
pub fn full_week() -> Scenario {
    let days = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
    let shifts = ["Morning", "Evening", "Night"];
    let cfg = config(&days, &shifts)
        .role_everywhere("waiter", 2)
        .role("Morning", "cook", 1)
        .role("Evening", "cook", 2)
        .role("Evening", "bartender", 1)
        .role("Night", "bartender", 1)
        .importance("cook", 3)
        .importance("bartender", 2)
        .max_consecutive(2)
        .staffing(1, 5)
        .build();

    let skills: [&[&str]; 8] = [
        &["waiter"],
        &["waiter", "bartender"],
        &["cook"],
        &["cook", "waiter"],
        &["bartender"],
        &["waiter"],
        &["cook"],
        &["waiter", "bartender", "cook"],
    ];
    let submissions = skills
        .iter()
        .enumerate()
        .map(|(i, held)| {
            let mut builder = held
                .iter()
                .fold(employee(&format!("emp{i}")), |b, s| b.skill(s));
            for day in 0..days.len() {
                for shift in 0..shifts.len() {
                    if (i * 3 + day * 2 + shift) % 5 != 0 {
                        let priority = 1 + ((i + day * 4 + shift * 3) % 10) as u8;
                        builder = builder.available(day, shift, priority);
                    }
                }
            }
            builder.build()
        })
        .collect();

    Scenario {
        name: "full-week",
        config: cfg,
        submissions,
    }
}
