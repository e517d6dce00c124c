use std::cell::Cell;
use std::collections::BTreeMap;

use tracing::debug;

use crate::errors::{Result, StockError};
use crate::model::{ItemName, StockCount, StockId, StockKey, StockRecord};

/// Item name → (stock id → unique name) for every record open under that name
pub type NameIndex = BTreeMap<ItemName, BTreeMap<StockId, String>>;

/// Result of an indexed read
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<'a> {
    /// An id key resolves to exactly one record
    Record(&'a StockRecord),
    /// An item key resolves to all of its records, possibly none
    Records(Vec<&'a StockRecord>),
}

/// Target chosen by [`Stockist::plan_stock_item`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockItemPlan {
    /// Allocate a new record for the item, optionally pinned to an id
    Create {
        item: ItemName,
        stock_id: Option<StockId>,
    },
    /// Adjust an existing record
    Existing(StockId),
}

/// In-memory stock ledger
///
/// Owns every stock record and the name index over them; both are only
/// ever changed together, so every id in the index has a record and every
/// record is indexed under its item. All mutations are refused while the
/// stock list is locked.
///
/// Not `Sync`: the allocation cursor is a `Cell`, advanced when the next
/// free id is read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stockist {
    stock: BTreeMap<StockId, StockRecord>,
    name_id_map: NameIndex,
    stock_locked: bool,
    next_free: Cell<Option<StockId>>,
}

impl Stockist {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Lock flag =====

    pub fn is_locked(&self) -> bool {
        self.stock_locked
    }

    pub fn lock_stock_list(&mut self) {
        self.stock_locked = true;
    }

    pub fn unlock_stock_list(&mut self) {
        self.stock_locked = false;
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.stock_locked = locked;
    }

    /// Set the lock flag from textual input
    ///
    /// Accepts `true/false`, `yes/no`, `on/off` and `1/0`, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` for anything else; the flag is left unchanged.
    pub fn set_locked_from_str(&mut self, value: &str) -> Result<()> {
        let locked = match value.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => true,
            "false" | "no" | "off" | "0" => false,
            other => {
                return Err(StockError::InvalidValue {
                    reason: format!("lock flag must be a boolean, got '{}'", other),
                })
            }
        };
        self.stock_locked = locked;
        Ok(())
    }

    /// Fail with `Locked` if the stock list is locked
    ///
    /// # Errors
    ///
    /// Returns `Locked` naming `op` while the lock flag is set.
    pub fn ensure_unlocked(&self, op: &str) -> Result<()> {
        if self.stock_locked {
            return Err(StockError::locked(op));
        }
        Ok(())
    }

    // ===== Reads =====

    /// Ids indexed under the item, ascending; empty if the item is unknown
    pub fn stock_ids_for_item(&self, item: &ItemName) -> Vec<StockId> {
        self.name_id_map
            .get(item)
            .map(|ids| ids.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Records indexed under the item, in index order
    pub fn stock_for_item(&self, item: &ItemName) -> Vec<&StockRecord> {
        self.stock_ids_for_item(item)
            .into_iter()
            .filter_map(|id| self.stock.get(&id))
            .collect()
    }

    /// Membership test: live stock id, or item present in the index
    pub fn contains(&self, key: impl Into<StockKey>) -> bool {
        match key.into() {
            StockKey::Id(id) => self.stock.contains_key(&id),
            StockKey::Item(item) => self.name_id_map.contains_key(&item),
        }
    }

    /// Get one record by id
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no record has this id.
    pub fn get(&self, stock_id: StockId) -> Result<&StockRecord> {
        self.stock
            .get(&stock_id)
            .ok_or(StockError::NotFound { stock_id })
    }

    /// Indexed read
    ///
    /// An id key yields its single record; an item key yields that item's
    /// records and never fails.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an id key with no record.
    pub fn lookup(&self, key: impl Into<StockKey>) -> Result<Lookup<'_>> {
        match key.into() {
            StockKey::Id(id) => self.get(id).map(Lookup::Record),
            StockKey::Item(item) => Ok(Lookup::Records(self.stock_for_item(&item))),
        }
    }

    pub fn stock_ids(&self) -> Vec<StockId> {
        self.stock.keys().copied().collect()
    }

    pub fn records(&self) -> impl Iterator<Item = &StockRecord> {
        self.stock.values()
    }

    pub fn len(&self) -> usize {
        self.stock.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stock.is_empty()
    }

    pub fn name_id_map(&self) -> &NameIndex {
        &self.name_id_map
    }

    /// Greatest live id
    pub fn last_stock_id(&self) -> Option<StockId> {
        self.stock.keys().next_back().copied()
    }

    pub fn last_stock_entry(&self) -> Option<&StockRecord> {
        self.stock.values().next_back()
    }

    /// `(id, count)` for every record
    pub fn stock_count(&self) -> Vec<(StockId, StockCount)> {
        self.stock.values().map(|r| (r.stock_id, r.count)).collect()
    }

    /// Ids of records holding a positive count
    pub fn list_stocked_item_ids(&self) -> Vec<StockId> {
        self.stock_count()
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn item_stocked(&self, item: &ItemName) -> bool {
        self.name_id_map.contains_key(item)
    }

    /// Stocked, and the most recently allocated record has a positive count
    ///
    /// Only that one record is consulted, not the total across records.
    pub fn is_item_in_stock(&self, item: &ItemName) -> bool {
        self.last_stock_entry_for_item(item)
            .map(|record| record.count > 0)
            .unwrap_or(false)
    }

    /// Numerically greatest id among the item's records
    pub fn last_stock_id_for_item(&self, item: &ItemName) -> Option<StockId> {
        self.name_id_map
            .get(item)
            .and_then(|ids| ids.keys().next_back().copied())
    }

    pub fn last_stock_entry_for_item(&self, item: &ItemName) -> Option<&StockRecord> {
        self.last_stock_id_for_item(item)
            .and_then(|id| self.stock.get(&id))
    }

    // ===== Allocation =====

    /// Smallest id at or above the cursor that is not in use
    ///
    /// Advances the cursor to the returned id. Ids freed below the cursor
    /// are not reconsidered until [`Self::reset_next_free_stock_id`].
    pub fn next_free_stock_id(&self) -> StockId {
        let mut candidate = self.next_free.get().unwrap_or(0);
        while self.stock.contains_key(&candidate) {
            candidate += 1;
        }
        self.next_free.set(Some(candidate));
        candidate
    }

    /// Force the next allocation to rescan from zero
    pub fn reset_next_free_stock_id(&mut self) {
        self.next_free.set(None);
    }

    // ===== Mutations =====

    /// Create a record for `item` and return its id
    ///
    /// With `new_id` the record is pinned to that id, otherwise the next
    /// free id is used. An id already in use is replaced only when `force`
    /// is set; the replacement starts again from a zero count.
    ///
    /// # Errors
    ///
    /// - `Locked` if the stock list is locked
    /// - `DuplicateId` if the id is in use and `force` is not set
    pub fn new_stock_item(
        &mut self,
        item: &ItemName,
        new_id: Option<StockId>,
        force: bool,
    ) -> Result<StockId> {
        self.ensure_unlocked("new_stock_item")?;
        let stock_id = self.claim_stock_id(new_id, force)?;
        if force && self.stock.contains_key(&stock_id) {
            self.delete_stock_entry(stock_id)?;
        }
        self.insert_record(StockRecord::new(stock_id, item.clone()));
        Ok(stock_id)
    }

    /// Resolve the id a creation would use, rejecting duplicates without `force`
    ///
    /// # Errors
    ///
    /// Returns `DuplicateId` if the id is in use and `force` is not set.
    pub fn claim_stock_id(&self, new_id: Option<StockId>, force: bool) -> Result<StockId> {
        let stock_id = new_id.unwrap_or_else(|| self.next_free_stock_id());
        if self.stock.contains_key(&stock_id) && !force {
            return Err(StockError::DuplicateId { stock_id });
        }
        Ok(stock_id)
    }

    /// Remove one record and its index entry
    ///
    /// # Errors
    ///
    /// - `Locked` if the stock list is locked
    /// - `NotFound` if no record has this id
    pub fn delete_stock_entry(&mut self, stock_id: StockId) -> Result<StockRecord> {
        self.ensure_unlocked("delete_stock_entry")?;
        let record = self
            .stock
            .remove(&stock_id)
            .ok_or(StockError::NotFound { stock_id })?;
        self.unindex(&record);
        debug!(stock_id, item = %record.item, "Deleted stock record");
        Ok(record)
    }

    /// Add `amount` (may be negative) to a record's count
    ///
    /// There is no floor: counts may go below zero.
    ///
    /// # Errors
    ///
    /// - `Locked` if the stock list is locked
    /// - `NotFound` if no record has this id
    /// - `InvalidValue` if the new count overflows; the record is unchanged
    pub fn increase_stock(&mut self, stock_id: StockId, amount: StockCount) -> Result<StockCount> {
        self.ensure_unlocked("increase_stock")?;
        let record = self
            .stock
            .get_mut(&stock_id)
            .ok_or(StockError::NotFound { stock_id })?;
        let current = record.count;
        record.count = current
            .checked_add(amount)
            .ok_or_else(|| StockError::InvalidValue {
                reason: format!(
                    "adding {} to stock {} overflows its count of {}",
                    amount, stock_id, current
                ),
            })?;
        debug!(stock_id, amount, count = record.count, "Adjusted stock count");
        Ok(record.count)
    }

    /// Decide which record [`Self::stock_item`] acts on
    ///
    /// - an item that is new, or `create` set: a new record (at `stock_id` if given)
    /// - a stocked item: `stock_id` if given, else the item's last record
    /// - no item: `stock_id` directly
    ///
    /// # Errors
    ///
    /// Returns `InvalidItem` when neither an item nor an id is given, and
    /// `ItemNotFound` if a stocked item has no last record.
    pub fn plan_stock_item(
        &self,
        item: Option<&ItemName>,
        stock_id: Option<StockId>,
        create: bool,
    ) -> Result<StockItemPlan> {
        match (item, stock_id) {
            (Some(item), _) if create || !self.item_stocked(item) => Ok(StockItemPlan::Create {
                item: item.clone(),
                stock_id,
            }),
            (Some(_), Some(id)) => Ok(StockItemPlan::Existing(id)),
            (Some(item), None) => self
                .last_stock_id_for_item(item)
                .map(StockItemPlan::Existing)
                .ok_or_else(|| StockError::ItemNotFound {
                    item: item.to_string(),
                }),
            (None, Some(id)) => Ok(StockItemPlan::Existing(id)),
            (None, None) => Err(StockError::InvalidItem {
                reason: "either an item or a stock id is required".to_string(),
            }),
        }
    }

    /// Add `amount` to an item's stock, creating a record when needed
    ///
    /// Returns the id that received the amount.
    ///
    /// # Errors
    ///
    /// Any error of [`Self::plan_stock_item`], [`Self::new_stock_item`] or
    /// [`Self::increase_stock`].
    pub fn stock_item(
        &mut self,
        item: Option<&ItemName>,
        stock_id: Option<StockId>,
        amount: StockCount,
        create: bool,
    ) -> Result<StockId> {
        self.ensure_unlocked("stock_item")?;
        let target = match self.plan_stock_item(item, stock_id, create)? {
            StockItemPlan::Create { item, stock_id } => {
                self.new_stock_item(&item, stock_id, false)?
            }
            StockItemPlan::Existing(id) => id,
        };
        self.increase_stock(target, amount)?;
        Ok(target)
    }

    // ===== Indexed write / delete =====

    /// Indexed write
    ///
    /// An id key pins the new record to that id (replacing an existing one
    /// only with `force`); an item key allocates the next free id.
    ///
    /// # Errors
    ///
    /// Same as [`Self::new_stock_item`].
    pub fn assign(
        &mut self,
        key: impl Into<StockKey>,
        item: &ItemName,
        force: bool,
    ) -> Result<StockId> {
        self.ensure_unlocked("assign")?;
        match key.into() {
            StockKey::Id(id) => self.new_stock_item(item, Some(id), force),
            StockKey::Item(_) => self.new_stock_item(item, None, force),
        }
    }

    /// Indexed delete
    ///
    /// An id key removes that record; an item key removes every record
    /// indexed under the item. Returns the removed records.
    ///
    /// # Errors
    ///
    /// - `Locked` if the stock list is locked
    /// - `NotFound` for an id key with no record
    pub fn remove(&mut self, key: impl Into<StockKey>) -> Result<Vec<StockRecord>> {
        self.ensure_unlocked("remove")?;
        match key.into() {
            StockKey::Id(id) => Ok(vec![self.delete_stock_entry(id)?]),
            StockKey::Item(item) => self
                .stock_ids_for_item(&item)
                .into_iter()
                .map(|id| self.delete_stock_entry(id))
                .collect(),
        }
    }

    /// Place a record rebuilt elsewhere (e.g. from a store) into the ledger
    ///
    /// Any record already at the same id is replaced, including its index
    /// entry.
    ///
    /// # Errors
    ///
    /// Returns `Locked` if the stock list is locked.
    pub fn merge_record(&mut self, record: StockRecord) -> Result<()> {
        self.ensure_unlocked("merge_record")?;
        if let Some(previous) = self.stock.remove(&record.stock_id) {
            self.unindex(&previous);
        }
        self.insert_record(record);
        Ok(())
    }

    fn insert_record(&mut self, record: StockRecord) {
        debug!(stock_id = record.stock_id, item = %record.item, "Indexed stock record");
        self.name_id_map
            .entry(record.item.clone())
            .or_default()
            .insert(record.stock_id, record.unique_name.clone());
        self.stock.insert(record.stock_id, record);
    }

    fn unindex(&mut self, record: &StockRecord) {
        if let Some(ids) = self.name_id_map.get_mut(&record.item) {
            ids.remove(&record.stock_id);
            if ids.is_empty() {
                self.name_id_map.remove(&record.item);
            }
        }
    }
}
