//! Background service behaviour.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::request;
use roster::prelude::*;
use roster_solver::{BackendResult, LinearModel, SolveLimits};
use roster_test::scenarios;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(60);

#[tokio::test]
async fn completed_job_publishes_schedule_ready() {
    let service = SolverService::new();
    let mut notifications = service.notifications();

    let handle = service
        .submit(request(scenarios::single_employee_everywhere()))
        .unwrap();
    assert!(!handle.deduplicated);

    let state = timeout(WAIT, service.wait(&handle.id)).await.unwrap().unwrap();
    let JobState::Completed(outcome) = state else {
        panic!("unexpected state {state:?}");
    };
    assert_eq!(outcome.scheduled().unwrap().schedule.total_shortage(), 0);

    let notification = timeout(WAIT, notifications.recv()).await.unwrap().unwrap();
    assert_eq!(notification.job_id(), handle.id);
    assert!(matches!(
        notification,
        JobNotification::ScheduleReady { total_shortage: 0, .. }
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn identical_in_flight_request_is_deduplicated_and_cancellable() {
    let service =
        SolverService::with_config(SolverConfig::new().with_termination_seconds(600));
    let mut notifications = service.notifications();

    let first = service.submit(request(scenarios::full_week())).unwrap();
    let second = service.submit(request(scenarios::full_week())).unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.fingerprint, second.fingerprint);
    assert!(second.deduplicated);
    assert_eq!(service.list_jobs(), vec![first.id.clone()]);

    assert!(service.cancel(&first.id));
    let state = timeout(WAIT, service.wait(&first.id)).await.unwrap().unwrap();
    assert!(matches!(state, JobState::Cancelled), "{state:?}");
    assert!(!service.cancel(&first.id));

    let notification = timeout(WAIT, notifications.recv()).await.unwrap().unwrap();
    assert!(matches!(notification, JobNotification::Cancelled { .. }));

    // a cancelled job no longer absorbs new submissions
    let third = service.submit(request(scenarios::full_week())).unwrap();
    assert_ne!(third.id, first.id);
    assert!(!third.deduplicated);
    service.cancel(&third.id);
    timeout(WAIT, service.wait(&third.id)).await.unwrap();
}

#[tokio::test]
async fn exhausted_budget_publishes_no_schedule() {
    let service = SolverService::with_config(SolverConfig::new().with_node_limit(1));
    let mut notifications = service.notifications();

    let handle = service.submit(request(scenarios::restaurant_days())).unwrap();
    let state = timeout(WAIT, service.wait(&handle.id)).await.unwrap().unwrap();

    let JobState::Completed(outcome) = state else {
        panic!("unexpected state {state:?}");
    };
    assert!(outcome.no_schedule().is_some());

    let notification = timeout(WAIT, notifications.recv()).await.unwrap().unwrap();
    let JobNotification::NoSchedule { report, .. } = notification else {
        panic!("unexpected notification {notification:?}");
    };
    assert_eq!(report.node_limit, Some(1));
}

#[tokio::test]
async fn input_errors_fail_the_job() {
    let service = SolverService::new();
    let mut req = request(scenarios::consecutive_cap());
    req.submissions.clear();

    let handle = service.submit(req).unwrap();
    let state = timeout(WAIT, service.wait(&handle.id)).await.unwrap().unwrap();

    let JobState::Failed(error) = state else {
        panic!("unexpected state {state:?}");
    };
    assert_eq!(error, RosterError::NoEmployees.to_string());
}

#[tokio::test]
async fn oversized_weights_fail_the_job() {
    let weights = ObjectiveWeights::new(1000, 4_000_000_000_000_000_000, 100);
    let service = SolverService::with_config(SolverConfig::new().with_weights(weights));

    let handle = service.submit(request(scenarios::role_without_candidates())).unwrap();
    let state = timeout(WAIT, service.wait(&handle.id)).await.unwrap().unwrap();

    let JobState::Failed(error) = state else {
        panic!("unexpected state {state:?}");
    };
    assert!(error.contains("overflows"), "{error}");
}

#[derive(Debug)]
struct BrokenBackend;

impl Backend for BrokenBackend {
    fn name(&self) -> &'static str {
        "broken"
    }

    fn solve(&self, _model: &LinearModel, _limits: &SolveLimits) -> BackendResult {
        panic!("backend exploded");
    }
}

#[tokio::test]
async fn panicking_solve_fails_the_job_and_frees_the_request() {
    let service = SolverService::with_backend(SolverConfig::new(), Arc::new(BrokenBackend));
    let mut notifications = service.notifications();

    let first = service.submit(request(scenarios::preference_decides())).unwrap();
    let state = timeout(WAIT, service.wait(&first.id)).await.unwrap().unwrap();
    let JobState::Failed(error) = state else {
        panic!("unexpected state {state:?}");
    };
    assert!(error.contains("backend exploded"), "{error}");

    let notification = timeout(WAIT, notifications.recv()).await.unwrap().unwrap();
    assert_eq!(notification.job_id(), first.id);
    assert!(matches!(notification, JobNotification::Failed { .. }));

    let second = service.submit(request(scenarios::preference_decides())).unwrap();
    assert_ne!(second.id, first.id);
    assert!(!second.deduplicated);
    timeout(WAIT, service.wait(&second.id)).await.unwrap();
}

#[tokio::test]
async fn finished_jobs_can_be_removed() {
    let service = SolverService::new();
    let a = service.submit(request(scenarios::preference_decides())).unwrap();
    let b = service.submit(request(scenarios::consecutive_cap())).unwrap();

    timeout(WAIT, service.wait(&a.id)).await.unwrap();
    timeout(WAIT, service.wait(&b.id)).await.unwrap();

    let mut expected = vec![a.id.clone(), b.id.clone()];
    expected.sort();
    assert_eq!(service.list_jobs(), expected);

    assert!(service.remove(&a.id));
    assert!(!service.remove(&a.id));
    assert!(service.status(&a.id).is_none());
    assert_eq!(service.list_jobs(), vec![b.id.clone()]);
}

#[tokio::test]
async fn finished_jobs_are_pruned_after_retention() {
    let service = SolverService::new();
    let a = service.submit(request(scenarios::preference_decides())).unwrap();
    timeout(WAIT, service.wait(&a.id)).await.unwrap();

    assert_eq!(service.prune_finished(Duration::from_secs(3600)), 0);
    assert_eq!(service.list_jobs(), vec![a.id.clone()]);
    assert_eq!(service.prune_finished(Duration::ZERO), 1);
    assert!(service.status(&a.id).is_none());

    let service = SolverService::new().with_retention(Duration::ZERO);
    let b = service.submit(request(scenarios::preference_decides())).unwrap();
    timeout(WAIT, service.wait(&b.id)).await.unwrap();
    let c = service.submit(request(scenarios::consecutive_cap())).unwrap();

    assert_eq!(service.list_jobs(), vec![c.id.clone()]);
    timeout(WAIT, service.wait(&c.id)).await.unwrap();
}

#[tokio::test]
async fn finished_request_can_be_resubmitted() {
    let service = SolverService::new();
    let first = service.submit(request(scenarios::preference_decides())).unwrap();
    timeout(WAIT, service.wait(&first.id)).await.unwrap();

    let second = service.submit(request(scenarios::preference_decides())).unwrap();
    assert_ne!(first.id, second.id);
    assert!(!second.deduplicated);
}

#[test]
fn submit_requires_a_runtime() {
    let service = SolverService::new();
    let err = service
        .submit(request(scenarios::preference_decides()))
        .unwrap_err();

    assert!(matches!(err, RosterError::Internal(_)));
}
