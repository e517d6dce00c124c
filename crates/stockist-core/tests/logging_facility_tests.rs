#![allow(clippy::unwrap_used, clippy::expect_used)]

use stockist_core::errors::StockError;
use stockist_core::logging_facility::test_capture::init_test_capture;
use stockist_core::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_ERR_CODE, FIELD_ITEM, FIELD_STOCK_ID,
};
use stockist_core::{log_op_end, log_op_error, log_op_start};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name, item = "widget");

    let events = capture.events_for(op_name, EVENT_START);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].fields.get("item"), Some(&"widget".to_string()));
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42u64);

    let events = capture.events_for(op_name, EVENT_END);
    assert_eq!(events.len(), 1, "Should have exactly one end event");
    assert_eq!(events[0].fields.get("duration_ms"), Some(&"42".to_string()));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    log_op_error!(op_name, StockError::NotFound { stock_id: 1 }, duration_ms = 10u64);

    let events = capture.events_for(op_name, EVENT_END_ERROR);
    assert_eq!(events.len(), 1, "Should have exactly one error event");
    assert_eq!(events[0].field(FIELD_ERR_CODE), Some("ERR_NOT_FOUND"));
    assert_eq!(events[0].field(FIELD_STOCK_ID), Some("1"));
    assert_eq!(events[0].field(FIELD_ITEM), None);
    assert_eq!(events[0].level, tracing::Level::ERROR);
}
