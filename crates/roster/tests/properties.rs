//! Hard invariants over small random rosters.

mod common;

use common::assert_invariants;
use proptest::collection::vec;
use proptest::option;
use proptest::prelude::*;
use roster::prelude::*;
use roster_test::{config, employee};

const ROLES: [&str; 2] = ["server", "runner"];

#[derive(Debug, Clone)]
struct Person {
    skills: (bool, bool),
    availability: Vec<Option<u8>>,
}

fn person(slots: usize) -> impl Strategy<Value = Person> {
    (any::<bool>(), any::<bool>(), vec(option::of(1u8..=10), slots))
        .prop_map(|(a, b, availability)| Person {
            skills: (a, b),
            availability,
        })
}

prop_compose! {
    fn roster_request()(days in 1usize..=2, shifts in 1usize..=2)(
        requirements in vec((0u32..=2, 0u32..=2), shifts),
        importance in (1u32..=3, 1u32..=3),
        max_consecutive in 1u32..=3,
        max_staff in 1u32..=3,
        people in vec(person(days * shifts), 1..=3),
        days in Just(days),
        shifts in Just(shifts),
    ) -> ScheduleRequest {
        let day_names: Vec<String> = (0..days).map(|d| format!("D{d}")).collect();
        let shift_names: Vec<String> = (0..shifts).map(|s| format!("S{s}")).collect();
        let day_refs: Vec<&str> = day_names.iter().map(String::as_str).collect();
        let shift_refs: Vec<&str> = shift_names.iter().map(String::as_str).collect();

        let mut builder = config(&day_refs, &shift_refs)
            .max_consecutive(max_consecutive)
            .staffing(0, max_staff);
        for (shift, (a, b)) in shift_refs.iter().zip(&requirements) {
            builder = builder.role(shift, ROLES[0], *a).role(shift, ROLES[1], *b);
        }
        builder = builder.importance(ROLES[0], importance.0).importance(ROLES[1], importance.1);

        let submissions = people
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let mut e = employee(&format!("p{i}"));
                if p.skills.0 {
                    e = e.skill(ROLES[0]);
                }
                if p.skills.1 {
                    e = e.skill(ROLES[1]);
                }
                for (slot, priority) in p.availability.iter().enumerate() {
                    if let Some(priority) = priority {
                        e = e.available(slot / shifts, slot % shifts, *priority);
                    }
                }
                e.build()
            })
            .collect();

        ScheduleRequest::new(builder.build(), submissions)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn solved_rosters_respect_hard_constraints(request in roster_request()) {
        let config = SolverConfig::new().with_termination_seconds(10);
        let outcome = solve_schedule(&request, &config, &BranchAndBound::new()).unwrap();
        let solved = outcome.scheduled().expect("small rosters always solve");

        assert_invariants(&request, &solved.schedule);
        prop_assert_eq!(solved.objective, solved.breakdown.total);
        prop_assert_eq!(solved.narrative.len(), request.config.slot_count());
    }

    #[test]
    fn optimal_objective_is_reproducible(request in roster_request()) {
        let config = SolverConfig::new().with_termination_seconds(10);
        let first = solve_schedule(&request, &config, &BranchAndBound::new()).unwrap();
        let second = solve_schedule(&request, &config, &BranchAndBound::new()).unwrap();
        let (first, second) = (first.scheduled().unwrap(), second.scheduled().unwrap());

        if first.quality == SolveQuality::Optimal && second.quality == SolveQuality::Optimal {
            prop_assert_eq!(first.objective, second.objective);
            prop_assert_eq!(
                first.schedule.total_shortage(),
                second.schedule.total_shortage()
            );
        }
    }
}
