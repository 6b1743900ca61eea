//! Event stream and error behaviour of a replay

use replay::model::HookType;
use replay::reporter::EventLog;
use replay::{build, DriverState, Error, ErrorKind, Outcome, Replay};
use serde_json::json;

fn fixture(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    std::fs::read_to_string(path).unwrap()
}

fn events_of(input: serde_json::Value) -> Vec<&'static str> {
    let mut log = EventLog::new();
    let mut replay = Replay::build(input).unwrap();
    replay.add_listener(&mut log);
    replay.run().unwrap();
    drop(replay);
    log.names()
}

#[test]
fn test_three_outcome_run() {
    let input = json!({ "suite": { "title": "", "tests": [
        { "title": "passing test", "state": "passed" },
        { "title": "failing test", "state": "failed", "err": { "message": "FAIL" } },
        { "title": "pending test", "pending": true }
    ]}});

    assert_eq!(
        events_of(input.clone()),
        vec![
            "run-begin",
            "suite-begin",
            "test-pass",
            "test-end",
            "test-failure",
            "test-end",
            "test-pending",
            "test-end",
            "suite-end",
            "run-end"
        ]
    );

    let summary = Replay::build(input).unwrap().run().unwrap();
    assert_eq!(summary.stats.tests, 3);
    assert_eq!(summary.stats.passes, 1);
    assert_eq!(summary.stats.failures, 1);
    assert_eq!(summary.stats.pending, 1);
    assert_eq!(summary.stats.suites, 1);
}

#[test]
fn test_nested_fixture_sequence() {
    let input: serde_json::Value = serde_json::from_str(&fixture("full_run.json")).unwrap();
    assert_eq!(
        events_of(input),
        vec![
            "run-begin",
            "suite-begin",
            "test-pass",
            "test-end",
            "suite-begin",
            "test-pass",
            "test-end",
            "test-failure",
            "test-end",
            "test-pending",
            "test-end",
            "suite-begin",
            "test-pass",
            "test-end",
            "suite-end",
            "suite-end",
            "suite-begin",
            "test-pending",
            "test-end",
            "suite-end",
            "suite-end",
            "run-end"
        ]
    );
}

#[test]
fn test_recorded_stats_survive_replay() {
    let mut replay = Replay::build(fixture("full_run.json")).unwrap();
    let before = replay.stats().clone();
    let summary = replay.run().unwrap();
    assert_eq!(summary.stats, before);
    assert_eq!(summary.failures, vec!["parser reads strings".to_string()]);
    assert_eq!(replay.state(), DriverState::Completed);
}

#[test]
fn test_failed_test_without_err_names_test() {
    let err = build(json!({ "title": "", "suites": [{ "title": "s", "tests": [
        { "title": "broken", "state": "failed" }
    ]}]}))
    .unwrap_err();
    assert!(matches!(err, Error::FailedWithoutError { ref title } if title == "broken"));
    assert_eq!(err.kind(), ErrorKind::Structural);
}

#[test]
fn test_input_errors() {
    let err = build(json!({ "stats": { "tests": 1 } })).unwrap_err();
    assert!(err.to_string().contains("missing root suite"));

    let err = build("{ not json").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);

    let err = build(json!({ "title": "", "tests": { "title": "not a list" } })).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
}

#[test]
fn test_unresolved_test_aborts_replay() {
    let mut replay = Replay::build(json!({ "title": "", "suites": [{ "title": "group", "tests": [
        { "title": "undecided", "pending": false }
    ]}]}))
    .unwrap();

    let err = replay.run().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedState);
    assert!(err.to_string().ends_with("test: group undecided"));
    assert_eq!(replay.state(), DriverState::Aborted);
    assert!(matches!(replay.run(), Err(Error::DriverState { .. })));
}

#[test]
fn test_hooks_replay_recorded_failure() {
    let root = build(fixture("hooks.json")).unwrap();
    let database = &root.suites[0];
    assert_eq!(database.full_title(), "database");

    let before_all = &database.hooks.get(HookType::BeforeAll)[0];
    assert_eq!(before_all.original_title.as_deref(), Some("connect"));
    assert!(before_all.recorded_error().is_none());

    // beforeEach ran fine for both settled tests, then failed
    let mut before_each = database.hooks.get(HookType::BeforeEach)[0].clone();
    assert!(before_each.run().is_ok());
    assert!(before_each.run().is_ok());
    let err = before_each.run().unwrap_err();
    assert_eq!(err.message(), "seed failed");

    let mut after_all = database.hooks.get(HookType::AfterAll)[0].clone();
    assert!(after_all.runnable.timed_out);
    assert!(after_all.run().is_err());

    assert!(database.hooks.get(HookType::AfterEach).is_empty());
    assert!(database
        .tests
        .iter()
        .all(|t| matches!(t.outcome(), Outcome::Passed)));
}

#[test]
fn test_back_references_resolve() {
    let root = build(fixture("full_run.json")).unwrap();
    let errors = &root.suites[0].suites[0];
    let parent = root.find(errors.parent.unwrap()).unwrap();
    assert_eq!(parent.title, "parser");
    assert_eq!(errors.tests[0].full_title(), "parser errors reports line numbers");
    assert_eq!(
        errors.tests[0].runnable.parent,
        Some(errors.id)
    );
}

#[test]
fn test_unresolved_test_in_non_root_top_suite_names_suite() {
    let mut replay = Replay::build(json!({ "title": "X", "root": false, "tests": [
        { "title": "t", "pending": false }
    ]}))
    .unwrap();

    let err = replay.run().unwrap_err();
    assert!(err.to_string().ends_with("test: X t"), "{err}");
}
