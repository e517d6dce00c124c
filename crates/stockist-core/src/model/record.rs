use serde::{Deserialize, Serialize};

use super::{ItemName, StockCount, StockId};
use crate::errors::Result;

/// Separator between the item and the id inside a unique name
pub const UNIQUE_NAME_SEPARATOR: &str = "_#";

/// One tracked unit of an item
///
/// `unique_name` is derived once at construction (`"<item>_#<id>"`) and
/// never recomputed; it is the label that survives persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub stock_id: StockId,
    pub item: ItemName,
    pub unique_name: String,
    pub count: StockCount,
}

impl StockRecord {
    /// Create a record with a zero count
    pub fn new(stock_id: StockId, item: ItemName) -> Self {
        let unique_name = format!("{}{}{}", item, UNIQUE_NAME_SEPARATOR, stock_id);
        Self {
            stock_id,
            item,
            unique_name,
            count: 0,
        }
    }

    /// Rebuild a record from its persisted parts
    ///
    /// The item is recovered from the unique name by splitting on the last
    /// separator. When the name carries no separator, or its suffix is not
    /// this record's id, the whole name is used as the item.
    ///
    /// # Errors
    ///
    /// Returns `InvalidItem` if the unique name is blank.
    pub fn from_persisted(
        stock_id: StockId,
        unique_name: String,
        count: StockCount,
    ) -> Result<Self> {
        let item = Self::item_from_unique_name(stock_id, &unique_name)?;
        Ok(Self {
            stock_id,
            item,
            unique_name,
            count,
        })
    }

    fn item_from_unique_name(stock_id: StockId, unique_name: &str) -> Result<ItemName> {
        match unique_name.rsplit_once(UNIQUE_NAME_SEPARATOR) {
            Some((item, suffix)) if suffix == stock_id.to_string() => {
                ItemName::new(item).or_else(|_| ItemName::new(unique_name))
            }
            _ => ItemName::new(unique_name),
        }
    }
}
