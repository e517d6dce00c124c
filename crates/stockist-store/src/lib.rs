//! Stockist Store - relational persistence for the stock ledger
//!
//! Provides:
//! - `SqlDialect`: table name, placeholders and statement templates per backend
//! - `StockConnection`: fetch rows / run a transaction, implemented for
//!   SQLite and (behind the `postgres` feature) PostgreSQL
//! - `DatabaseStockist`: the ledger with every mutation mirrored into a store,
//!   plus schema lifecycle, reconciliation and SQL export

pub mod connection;
pub mod database_stockist;
pub mod db;
pub mod dialect;
pub mod errors;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod sqlite;

// Re-export key types
pub use connection::{ConnectionSource, SqlValue, Statement, StockConnection, StockRow};
pub use database_stockist::{DatabaseStockist, SqliteStockist};
pub use dialect::{MirrorStatement, Placeholder, SqlDialect};
pub use errors::Result;
pub use sqlite::SqliteConnection;

#[cfg(feature = "postgres")]
pub use database_stockist::PostgresStockist;
#[cfg(feature = "postgres")]
pub use postgres::PostgresConnection;
