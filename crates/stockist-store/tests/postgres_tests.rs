// PostgreSQL binding checks that need no running server

#![cfg(feature = "postgres")]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use rusqlite::Connection;
use stockist_core::errors::StockError;
use stockist_store::{Placeholder, PostgresStockist};

#[test]
fn test_sqlite_connection_rejected_by_postgres_stockist() {
    let result = PostgresStockist::new(Connection::open_in_memory().unwrap());
    assert!(matches!(result, Err(StockError::InvalidValue { .. })));
}

#[test]
fn test_deferred_postgres_stockist_has_no_connection() {
    let mut stockist = PostgresStockist::new(None::<String>).unwrap();
    assert_eq!(stockist.dialect().placeholder(), Placeholder::Numbered);
    assert_eq!(stockist.create_database(), Err(StockError::NoConnection));
}

#[test]
fn test_postgres_export_uses_bigint_columns() {
    let stockist = PostgresStockist::new(None::<String>).unwrap();
    assert!(stockist
        .export_stock_to_sql()
        .contains("(pk BIGINT, name TEXT, count BIGINT)"));
}

