use serde::{Deserialize, Serialize};
use std::fmt;

use super::StockId;
use crate::errors::{Result, StockError};

/// Name under which one or more stock records are grouped
///
/// Identity is the string itself. Any identifier that should act as an
/// item must be converted explicitly, either through [`ItemName::new`] or
/// [`ItemName::from_display`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemName(pub(super) String);

impl ItemName {
    /// Create an item name
    ///
    /// # Errors
    ///
    /// Returns `InvalidItem` if the name is empty or whitespace only.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(StockError::InvalidItem {
                reason: "item name cannot be empty".to_string(),
            });
        }
        Ok(Self(name))
    }

    /// Coerce any displayable identifier into an item name
    ///
    /// # Errors
    ///
    /// Returns `InvalidItem` if the identifier renders as an empty string.
    pub fn from_display(identifier: &impl fmt::Display) -> Result<Self> {
        Self::new(identifier.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ItemName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ItemName {
    type Error = StockError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ItemName {
    type Error = StockError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ItemName> for String {
    fn from(value: ItemName) -> Self {
        value.0
    }
}

/// Key of the ledger's indexed operations
///
/// An id addresses exactly one record; an item addresses every record
/// currently indexed under that name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockKey {
    Id(StockId),
    Item(ItemName),
}

impl StockKey {
    /// Interpret user input: an unsigned integer is an id, anything else an item
    ///
    /// # Errors
    ///
    /// Returns `InvalidItem` if the input is not an id and is empty.
    pub fn parse(input: &str) -> Result<Self> {
        match input.trim().parse::<StockId>() {
            Ok(id) => Ok(StockKey::Id(id)),
            Err(_) => Ok(StockKey::Item(ItemName::new(input)?)),
        }
    }
}

impl From<StockId> for StockKey {
    fn from(id: StockId) -> Self {
        StockKey::Id(id)
    }
}

impl From<ItemName> for StockKey {
    fn from(item: ItemName) -> Self {
        StockKey::Item(item)
    }
}

impl From<&ItemName> for StockKey {
    fn from(item: &ItemName) -> Self {
        StockKey::Item(item.clone())
    }
}

impl fmt::Display for StockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockKey::Id(id) => write!(f, "#{}", id),
            StockKey::Item(item) => write!(f, "{}", item),
        }
    }
}
