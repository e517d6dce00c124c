pub mod item;
pub mod record;

pub use item::{ItemName, StockKey};
pub use record::{StockRecord, UNIQUE_NAME_SEPARATOR};

/// Identifier of one stock record, unique within a ledger
pub type StockId = u32;

/// Quantity held by a stock record; signed, decrements may drive it negative
pub type StockCount = i64;
