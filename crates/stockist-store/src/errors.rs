//! Error handling for stockist-store
//!
//! Wraps the core StockError with driver-specific helpers

use stockist_core::errors::StockError;

/// Result type alias using StockError
pub type Result<T> = std::result::Result<T, StockError>;

/// Create a persistence error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> StockError {
    StockError::Persistence {
        op: "sqlite".to_string(),
        message: err.to_string(),
    }
}

/// Create a persistence error from postgres::Error
#[cfg(feature = "postgres")]
pub fn from_postgres(err: postgres::Error) -> StockError {
    StockError::Persistence {
        op: "postgres".to_string(),
        message: err.to_string(),
    }
}

/// Create a corrupt row error
pub fn corrupt_row(reason: impl Into<String>) -> StockError {
    StockError::CorruptRow {
        reason: reason.into(),
    }
}

/// Create an error for a native connection handed to the wrong backend
pub fn wrong_connection(expected: &str, got: &str) -> StockError {
    StockError::InvalidValue {
        reason: format!("expected a {} connection, got a {} connection", expected, got),
    }
}
