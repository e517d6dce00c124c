// Lifecycle logging emitted by the persistence layer

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{item, memory_stockist};
use stockist_core::logging_facility::test_capture::init_test_capture;
use stockist_core::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use stockist_store::SqliteStockist;

#[test]
fn test_mutation_emits_start_and_end() {
    let capture = init_test_capture();
    let mut stockist = memory_stockist();

    stockist
        .new_stock_item(&item("widget"), None, false, true)
        .unwrap();

    capture.assert_event_exists("new_stock_item", EVENT_START);
    capture.assert_event_exists("new_stock_item", EVENT_END);
    let end = capture.events_for("new_stock_item", EVENT_END);
    assert!(end.iter().all(|e| e.fields.contains_key("duration_ms")));
}

#[test]
fn test_failure_emits_error_code() {
    let capture = init_test_capture();
    let mut stockist = SqliteStockist::new(None::<String>).unwrap();

    stockist.reset_database().unwrap_err();

    let errors = capture.events_for("reset_database", EVENT_END_ERROR);
    assert!(!errors.is_empty());
    assert!(errors
        .iter()
        .all(|e| e.field("err_code") == Some("ERR_NO_CONNECTION")));
    assert_eq!(errors[0].level, tracing::Level::ERROR);
}

#[test]
fn test_reconciliation_logged_under_its_op() {
    let capture = init_test_capture();
    let mut stockist = memory_stockist();

    stockist.update_stock_from_db(true).unwrap();

    capture.assert_event_exists("update_stock_from_db", EVENT_END);
}
