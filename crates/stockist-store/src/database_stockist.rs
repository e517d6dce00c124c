//! Database-backed stockist
//!
//! [`DatabaseStockist`] wraps the in-memory [`Stockist`] and mirrors every
//! mutation into a relational store through a [`StockConnection`].
//!
//! ## Mirroring
//!
//! Mutations take an `update_db` flag. When set, the in-memory change is
//! applied first and the matching statements are then committed in one
//! transaction. A missing dialect template (`NotImplemented`) or a missing
//! connection (`NoConnection`) is reported after the in-memory change has
//! already happened; the store is left untouched in that case.
//!
//! ## Logging Ownership
//!
//! This layer owns lifecycle logging (`log_op_start!` / `log_op_end!` /
//! `log_op_error!`); the ledger below only emits `tracing::debug!`.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Deref;
use std::time::Instant;

use stockist_core::errors::StockError;
use stockist_core::{log_op_end, log_op_error, log_op_start};
use stockist_core::{
    ItemName, StockCount, StockId, StockItemPlan, StockKey, StockRecord, Stockist,
};
use tracing::debug;

use crate::connection::{ConnectionSource, Statement, StockConnection, StockRow};
use crate::dialect::SqlDialect;
use crate::errors::Result;
use crate::sqlite::SqliteConnection;

/// Stockist persisted in SQLite
pub type SqliteStockist = DatabaseStockist<SqliteConnection>;

/// Stockist persisted in PostgreSQL
#[cfg(feature = "postgres")]
pub type PostgresStockist = DatabaseStockist<crate::postgres::PostgresConnection>;

/// Statements collected while a mutation runs, committed together
struct Mirror {
    enabled: bool,
    statements: Vec<Statement>,
}

impl Mirror {
    fn new(enabled: bool) -> Self {
        Self {
            enabled,
            statements: Vec::new(),
        }
    }

    fn record(&mut self, build: impl FnOnce() -> Result<Statement>) -> Result<()> {
        if self.enabled {
            self.statements.push(build()?);
        }
        Ok(())
    }
}

fn observed<T>(op: &'static str, run: impl FnOnce() -> Result<T>) -> Result<T> {
    log_op_start!(op);
    let start = Instant::now();
    let result = run();
    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => {
            log_op_end!(op, duration_ms = duration_ms);
        }
        Err(e) => {
            log_op_error!(op, e.clone(), duration_ms = duration_ms);
        }
    }
    result
}

/// Ledger synchronized with a relational store
///
/// Reads go straight to the in-memory ledger through `Deref`; every
/// mutation goes through this type so it can be mirrored.
pub struct DatabaseStockist<C: StockConnection> {
    stockist: Stockist,
    dialect: SqlDialect,
    connection: Option<C>,
}

impl<C: StockConnection> DatabaseStockist<C> {
    /// Create a stockist over an empty ledger
    ///
    /// [`ConnectionSource::None`] defers every store operation until
    /// [`Self::attach_connection`] is called.
    ///
    /// # Errors
    ///
    /// - `InvalidValue` for a native connection of another backend
    /// - `Persistence` if the store cannot be opened
    pub fn new(source: impl Into<ConnectionSource>) -> Result<Self> {
        Ok(Self {
            stockist: Stockist::new(),
            dialect: C::dialect(),
            connection: C::open(source.into())?,
        })
    }

    /// Create a stockist with no store attached
    pub fn detached() -> Self {
        Self {
            stockist: Stockist::new(),
            dialect: C::dialect(),
            connection: None,
        }
    }

    /// Replace the backend's default dialect
    pub fn with_dialect(mut self, dialect: SqlDialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Attach (or replace) the backing connection
    ///
    /// # Errors
    ///
    /// Same as [`Self::new`].
    pub fn attach_connection(&mut self, source: impl Into<ConnectionSource>) -> Result<()> {
        self.connection = C::open(source.into())?;
        Ok(())
    }

    pub fn has_connection(&self) -> bool {
        self.connection.is_some()
    }

    pub fn dialect(&self) -> &SqlDialect {
        &self.dialect
    }

    pub fn stockist(&self) -> &Stockist {
        &self.stockist
    }

    /// Mutable access to the backing connection
    ///
    /// # Errors
    ///
    /// Returns `NoConnection` if no store is attached.
    pub fn connection(&mut self) -> Result<&mut C> {
        self.connection.as_mut().ok_or(StockError::NoConnection)
    }

    fn commit(&mut self, statements: &[Statement]) -> Result<()> {
        if statements.is_empty() {
            return Ok(());
        }
        self.connection()?.run_transaction(statements)
    }

    fn flush(&mut self, mirror: Mirror) -> Result<()> {
        if !mirror.enabled {
            return Ok(());
        }
        self.commit(&mirror.statements)
    }

    // ===== Lock flag =====

    pub fn lock_stock_list(&mut self) {
        self.stockist.lock_stock_list();
    }

    pub fn unlock_stock_list(&mut self) {
        self.stockist.unlock_stock_list();
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.stockist.set_locked(locked);
    }

    /// # Errors
    ///
    /// Returns `InvalidValue` for a non-boolean value.
    pub fn set_locked_from_str(&mut self, value: &str) -> Result<()> {
        self.stockist.set_locked_from_str(value)
    }

    pub fn reset_next_free_stock_id(&mut self) {
        self.stockist.reset_next_free_stock_id();
    }

    // ===== Store reads =====

    /// Every stored row keyed by primary key
    ///
    /// # Errors
    ///
    /// `NoConnection`, `Persistence` or `CorruptRow`.
    pub fn database_stock(&mut self) -> Result<BTreeMap<StockId, StockRow>> {
        let sql = self.dialect.select_all_sql();
        let rows = self.connection()?.fetch_rows(&sql)?;
        Ok(rows.into_iter().map(|row| (row.pk, row)).collect())
    }

    fn database_keys(&mut self) -> Result<BTreeSet<StockId>> {
        Ok(self.database_stock()?.into_keys().collect())
    }

    /// The store holds ids the ledger does not
    ///
    /// # Errors
    ///
    /// Same as [`Self::database_stock`].
    pub fn is_missing_stock_from_database(&mut self) -> Result<bool> {
        let stored = self.database_keys()?;
        Ok(stored.iter().any(|id| !self.stockist.contains(*id)))
    }

    /// Every ledger id is present in the store
    ///
    /// # Errors
    ///
    /// Same as [`Self::database_stock`].
    pub fn is_database_up_to_date(&mut self) -> Result<bool> {
        let stored = self.database_keys()?;
        Ok(self.stockist.stock_ids().iter().all(|id| stored.contains(id)))
    }

    /// In-memory records as rows, ascending id
    pub fn stock_rows(&self) -> Vec<StockRow> {
        self.stockist.records().map(StockRow::from).collect()
    }

    // ===== Reconciliation =====

    /// Pull store rows into the ledger
    ///
    /// Runs when `force` is set or the store holds ids the ledger lacks.
    /// Without `force` only those missing ids are merged; with `force` every
    /// row is merged and the store's name and count win. Ledger entries
    /// absent from the store are kept. Returns the number of rows merged.
    ///
    /// # Errors
    ///
    /// `Locked`, plus any error of [`Self::database_stock`].
    pub fn update_stock_from_db(&mut self, force: bool) -> Result<usize> {
        observed("update_stock_from_db", || {
            self.stockist.ensure_unlocked("update_stock_from_db")?;
            if !force && !self.is_missing_stock_from_database()? {
                return Ok(0);
            }
            let mut merged = 0;
            for (pk, row) in self.database_stock()? {
                if force || !self.stockist.contains(pk) {
                    self.stockist.merge_record(row.into_record()?)?;
                    merged += 1;
                }
            }
            debug!(merged, force, "Reconciled stock from database");
            Ok(merged)
        })
    }

    // ===== Schema lifecycle =====

    /// Create the stock table if it does not exist
    ///
    /// # Errors
    ///
    /// `NoConnection` or `Persistence`.
    pub fn create_database(&mut self) -> Result<()> {
        observed("create_database", || {
            let create = Statement::plain(self.dialect.create_table_sql());
            self.commit(&[create])
        })
    }

    /// Drop and recreate an empty stock table
    ///
    /// # Errors
    ///
    /// `NoConnection` or `Persistence`.
    pub fn reset_database(&mut self) -> Result<()> {
        observed("reset_database", || {
            let statements = self.recreate_statements();
            self.commit(&statements)
        })
    }

    /// Drop and recreate the stock table, then insert every in-memory record
    ///
    /// # Errors
    ///
    /// `NotImplemented` without an insert template, `NoConnection` or
    /// `Persistence`. Nothing is written on error.
    pub fn dump_stock_to_database(&mut self) -> Result<()> {
        observed("dump_stock_to_database", || {
            let mut statements = self.recreate_statements();
            for row in self.stock_rows() {
                statements.push(self.dialect.insert(&row)?);
            }
            self.commit(&statements)
        })
    }

    /// Insert in-memory records into the store
    ///
    /// Without `force` only records whose id is not stored yet; with `force`
    /// every record, whatever the table already holds. Returns the number of
    /// rows inserted.
    ///
    /// # Errors
    ///
    /// `NotImplemented` without an insert template, `NoConnection` or
    /// `Persistence`.
    pub fn update_database(&mut self, force: bool) -> Result<usize> {
        observed("update_database", || {
            let rows = if force {
                self.stock_rows()
            } else {
                let stored = self.database_keys()?;
                self.stock_rows()
                    .into_iter()
                    .filter(|row| !stored.contains(&row.pk))
                    .collect()
            };
            let statements = rows
                .iter()
                .map(|row| self.dialect.insert(row))
                .collect::<Result<Vec<_>>>()?;
            self.commit(&statements)?;
            Ok(statements.len())
        })
    }

    /// The in-memory stock as a standalone SQL script
    pub fn export_stock_to_sql(&self) -> String {
        self.dialect.export_script(&self.stock_rows())
    }

    fn recreate_statements(&self) -> Vec<Statement> {
        vec![
            Statement::plain(self.dialect.drop_table_sql()),
            Statement::plain(self.dialect.create_table_sql()),
        ]
    }

    // ===== Mirrored mutations =====

    /// Create a record, mirroring the insert
    ///
    /// A forced replacement mirrors the delete of the old row and the
    /// insert of the new one in the same transaction.
    ///
    /// # Errors
    ///
    /// `Locked`, `DuplicateId`, and when `update_db` is set
    /// `NotImplemented`, `NoConnection` or `Persistence`.
    pub fn new_stock_item(
        &mut self,
        item: &ItemName,
        new_id: Option<StockId>,
        force: bool,
        update_db: bool,
    ) -> Result<StockId> {
        observed("new_stock_item", || {
            let mut mirror = Mirror::new(update_db);
            let stock_id = self.stage_new(item, new_id, force, &mut mirror)?;
            self.flush(mirror)?;
            Ok(stock_id)
        })
    }

    /// Delete a record, mirroring the delete
    ///
    /// # Errors
    ///
    /// `Locked`, `NotFound`, and when `update_db` is set `NotImplemented`,
    /// `NoConnection` or `Persistence`.
    pub fn delete_stock_entry(&mut self, stock_id: StockId, update_db: bool) -> Result<StockRecord> {
        observed("delete_stock_entry", || {
            let mut mirror = Mirror::new(update_db);
            let record = self.stage_delete(stock_id, &mut mirror)?;
            self.flush(mirror)?;
            Ok(record)
        })
    }

    /// Adjust a record's count, mirroring the new count
    ///
    /// # Errors
    ///
    /// `Locked`, `NotFound`, `InvalidValue` on count overflow (nothing is
    /// written), and when `update_db` is set `NotImplemented`,
    /// `NoConnection` or `Persistence`.
    pub fn increase_stock(
        &mut self,
        stock_id: StockId,
        amount: StockCount,
        update_db: bool,
    ) -> Result<StockCount> {
        observed("increase_stock", || {
            let mut mirror = Mirror::new(update_db);
            let count = self.stage_increase(stock_id, amount, &mut mirror)?;
            self.flush(mirror)?;
            Ok(count)
        })
    }

    /// Mirrored counterpart of [`Stockist::stock_item`]
    ///
    /// A creation and the count adjustment are committed together.
    ///
    /// # Errors
    ///
    /// Any error of the ledger's `stock_item`, plus the store errors of the
    /// mirrored mutations.
    pub fn stock_item(
        &mut self,
        item: Option<&ItemName>,
        stock_id: Option<StockId>,
        amount: StockCount,
        create: bool,
        update_db: bool,
    ) -> Result<StockId> {
        observed("stock_item", || {
            self.stockist.ensure_unlocked("stock_item")?;
            let mut mirror = Mirror::new(update_db);
            let target = match self.stockist.plan_stock_item(item, stock_id, create)? {
                StockItemPlan::Create { item, stock_id } => {
                    self.stage_new(&item, stock_id, false, &mut mirror)?
                }
                StockItemPlan::Existing(id) => id,
            };
            self.stage_increase(target, amount, &mut mirror)?;
            self.flush(mirror)?;
            Ok(target)
        })
    }

    /// Mirrored indexed write
    ///
    /// # Errors
    ///
    /// Same as [`Self::new_stock_item`].
    pub fn assign(
        &mut self,
        key: impl Into<StockKey>,
        item: &ItemName,
        force: bool,
        update_db: bool,
    ) -> Result<StockId> {
        self.stockist.ensure_unlocked("assign")?;
        match key.into() {
            StockKey::Id(id) => self.new_stock_item(item, Some(id), force, update_db),
            StockKey::Item(_) => self.new_stock_item(item, None, force, update_db),
        }
    }

    /// Mirrored indexed delete; an item key removes all of its records in
    /// one transaction
    ///
    /// # Errors
    ///
    /// Same as [`Self::delete_stock_entry`].
    pub fn remove(&mut self, key: impl Into<StockKey>, update_db: bool) -> Result<Vec<StockRecord>> {
        observed("remove", || {
            self.stockist.ensure_unlocked("remove")?;
            let ids = match key.into() {
                StockKey::Id(id) => vec![id],
                StockKey::Item(item) => self.stockist.stock_ids_for_item(&item),
            };
            let mut mirror = Mirror::new(update_db);
            let removed = ids
                .into_iter()
                .map(|id| self.stage_delete(id, &mut mirror))
                .collect::<Result<Vec<_>>>()?;
            self.flush(mirror)?;
            Ok(removed)
        })
    }

    fn stage_new(
        &mut self,
        item: &ItemName,
        new_id: Option<StockId>,
        force: bool,
        mirror: &mut Mirror,
    ) -> Result<StockId> {
        self.stockist.ensure_unlocked("new_stock_item")?;
        let stock_id = self.stockist.claim_stock_id(new_id, force)?;
        if self.stockist.contains(stock_id) {
            self.stage_delete(stock_id, mirror)?;
        }
        self.stockist.new_stock_item(item, Some(stock_id), false)?;
        let row = StockRow::from(self.stockist.get(stock_id)?);
        mirror.record(|| self.dialect.insert(&row))?;
        Ok(stock_id)
    }

    fn stage_delete(&mut self, stock_id: StockId, mirror: &mut Mirror) -> Result<StockRecord> {
        let record = self.stockist.delete_stock_entry(stock_id)?;
        mirror.record(|| self.dialect.delete(stock_id))?;
        Ok(record)
    }

    fn stage_increase(
        &mut self,
        stock_id: StockId,
        amount: StockCount,
        mirror: &mut Mirror,
    ) -> Result<StockCount> {
        let count = self.stockist.increase_stock(stock_id, amount)?;
        mirror.record(|| self.dialect.update_count(stock_id, count))?;
        Ok(count)
    }
}

impl<C: StockConnection> Deref for DatabaseStockist<C> {
    type Target = Stockist;

    fn deref(&self) -> &Stockist {
        &self.stockist
    }
}
