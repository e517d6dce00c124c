//! Canonical logging macros
//!
//! Each macro takes the operation name first and accepts trailing
//! `tracing` fields.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use stockist_core::log_op_start;
/// log_op_start!("new_stock_item");
/// log_op_start!("new_stock_item", item = "widget");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_START,
            $($($field)*)?
        )
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use stockist_core::log_op_end;
/// log_op_end!("increase_stock", duration_ms = 3);
/// log_op_end!("update_database", duration_ms = 3, inserted = 2);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)*)?
        )
    };
}

/// Log an operation error
///
/// The error is converted into an [`ExError`](crate::errors::ExError); its
/// kind, stable code, and any stock id or item it names become fields.
///
/// # Example
///
/// ```
/// # use stockist_core::{log_op_error, errors::StockError};
/// let err = StockError::NotFound { stock_id: 7 };
/// log_op_error!("delete_stock_entry", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            stock_id = ex_err.stock_id(),
            item = ex_err.item(),
            $($($field)*)?
        )
    }};
}
