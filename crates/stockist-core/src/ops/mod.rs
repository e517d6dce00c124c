pub mod ledger;

pub use ledger::{Lookup, NameIndex, StockItemPlan, Stockist};
