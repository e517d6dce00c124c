//! Stockist Core - in-memory stock bookkeeping
//!
//! This crate provides:
//! - Item identity and stock record models
//! - The `Stockist` ledger: id allocation, the name index, the lock flag
//!   and invariant-checked mutations
//! - The error facility (`StockError`, `ExError`)
//! - The structured logging facility shared with the store and CLI
//!
//! Nothing in this crate performs I/O.

pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod schema;

pub use errors::{ExError, ExErrorKind, Result, StockError};
pub use model::{ItemName, StockCount, StockId, StockKey, StockRecord};
pub use ops::{Lookup, NameIndex, StockItemPlan, Stockist};
