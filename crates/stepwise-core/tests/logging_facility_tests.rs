#![allow(clippy::unwrap_used, clippy::expect_used)]

use stepwise_core::errors::MigrateError;
use stepwise_core::logging_facility::test_capture::init_test_capture;
use stepwise_core::memory::{MemoryDb, MemorySource};
use stepwise_core::{log_op_end, log_op_error, log_op_start};
use stepwise_core::{run, Directive, MigrateOptions};
use stepwise_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START, EVENT_STEP};
use stepwise_core_types::RunId;

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    capture.assert_event_exists(op_name, EVENT_START);
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let end_events = capture
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END));
    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].field("duration_ms"), Some("42"));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = MigrateError::InvalidDirective {
        reason: "none given".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let error_events = capture.filter(|e| {
        e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END_ERROR)
    });
    assert_eq!(error_events.len(), 1, "Should have exactly one error event");
    assert_eq!(
        error_events[0].field("err.code"),
        Some("ERR_INVALID_DIRECTIVE")
    );
}

#[test]
fn test_run_emits_boundaries_and_one_step_per_unit() {
    let capture = init_test_capture();
    let run_id = RunId::new();
    let source = MemorySource::new()
        .with_unit(1, "init", "up 1", "down 1")
        .with_unit(2, "add-col", "up 2", "down 2");
    let mut db = MemoryDb::new();
    let mut tx = db.begin();

    run(
        &mut tx,
        &source,
        Directive::All,
        &MigrateOptions {
            dry_run: false,
            run_id: Some(run_id.clone()),
        },
    )
    .unwrap();

    let mine = |e: &stepwise_core::logging_facility::CapturedEvent| {
        e.field("run_id") == Some(run_id.as_str())
    };
    assert_eq!(
        capture.count_events(|e| mine(e) && e.event.as_deref() == Some(EVENT_START)),
        1
    );
    assert_eq!(
        capture.count_events(|e| mine(e) && e.event.as_deref() == Some(EVENT_END)),
        1
    );

    // No other test in this binary executes units
    let steps: Vec<String> = capture
        .filter(|e| {
            e.event.as_deref() == Some(EVENT_STEP)
                && matches!(e.field("name"), Some("init") | Some("add col"))
        })
        .iter()
        .filter_map(|e| e.field("version").map(str::to_string))
        .collect();
    assert_eq!(steps, vec!["1".to_string(), "2".to_string()]);
}

#[test]
fn test_failed_run_emits_error_boundary_with_run_id() {
    let capture = init_test_capture();
    let run_id = RunId::new();
    let source = MemorySource::new().with_unit(1, "seed", "up seed", "down seed");
    let mut db = MemoryDb::new();
    let mut tx = db.begin();

    let err = run(
        &mut tx,
        &source,
        Directive::Down(1),
        &MigrateOptions {
            dry_run: false,
            run_id: Some(run_id.clone()),
        },
    )
    .unwrap_err();
    assert!(matches!(err, MigrateError::PlanOutOfRange { .. }));

    let errors = capture.filter(|e| {
        e.field("run_id") == Some(run_id.as_str()) && e.event.as_deref() == Some(EVENT_END_ERROR)
    });
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field("err.code"), Some("ERR_PLAN_OUT_OF_RANGE"));
    assert_eq!(
        capture.count_events(|e| {
            e.field("run_id") == Some(run_id.as_str()) && e.event.as_deref() == Some(EVENT_END)
        }),
        0
    );
}
