use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::*;

#[test]
fn test_node_count_termination() {
    let mut scope = SearchScope::new();
    scope.start_solving();
    let term = NodeCountTermination::new(3);

    assert!(!term.is_terminated(&scope));
    scope.increment_node_count();
    scope.increment_node_count();
    assert!(!term.is_terminated(&scope));
    scope.increment_node_count();
    assert!(term.is_terminated(&scope));
    assert_eq!(term.reason(&scope), TerminationReason::NodeLimit);
}

#[test]
fn test_time_termination_not_started() {
    let scope = SearchScope::new();
    let term = TimeTermination::new(Duration::ZERO);

    assert!(!term.is_terminated(&scope));
}

#[test]
fn test_time_termination_zero_limit() {
    let mut scope = SearchScope::new();
    scope.start_solving();
    let term = TimeTermination::millis(0);

    assert!(term.is_terminated(&scope));
    assert_eq!(term.reason(&scope), TerminationReason::TimeLimit);
}

#[test]
fn test_time_termination_long_limit() {
    let mut scope = SearchScope::new();
    scope.start_solving();

    assert!(!TimeTermination::seconds(3600).is_terminated(&scope));
}

#[test]
fn test_external_termination() {
    let scope = SearchScope::new();
    let flag = Arc::new(AtomicBool::new(false));
    let term = ExternalTermination::new(flag.clone());

    assert!(!term.is_terminated(&scope));
    flag.store(true, Ordering::SeqCst);
    assert!(term.is_terminated(&scope));
    assert_eq!(term.reason(&scope), TerminationReason::Cancelled);
}

#[test]
fn test_absent_termination_never_fires() {
    let scope = SearchScope::new();
    let term: Option<NodeCountTermination> = None;

    assert!(!term.is_terminated(&scope));
}

#[test]
fn test_or_termination_reports_fired_child() {
    let mut scope = SearchScope::new();
    scope.start_solving();
    scope.increment_node_count();

    let flag = Arc::new(AtomicBool::new(false));
    let term = OrTermination((
        Some(TimeTermination::seconds(3600)),
        Some(NodeCountTermination::new(1)),
        Some(ExternalTermination::new(flag.clone())),
    ));

    assert!(term.is_terminated(&scope));
    assert_eq!(term.reason(&scope), TerminationReason::NodeLimit);

    let term = OrTermination((
        None::<TimeTermination>,
        None::<NodeCountTermination>,
        Some(ExternalTermination::new(flag.clone())),
    ));
    assert!(!term.is_terminated(&scope));
    flag.store(true, Ordering::SeqCst);
    assert_eq!(term.reason(&scope), TerminationReason::Cancelled);
}
