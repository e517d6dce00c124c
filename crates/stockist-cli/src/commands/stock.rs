//! Mutating commands: clear, stock, remove, delete
//!
//! Every mutation is mirrored into the store.

use anyhow::Context;
use clap::Args;
use stockist_core::{StockId, StockKey};
use stockist_store::SqliteStockist;

use super::outcome;
use crate::printer::Printer;

#[derive(Debug, Args)]
pub struct ClearArgs {
    /// Skip the confirmation prompt
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(Debug, Args)]
pub struct StockArgs {
    pub name_or_id: String,

    #[arg(default_value_t = 1, allow_negative_numbers = true)]
    pub amount: i64,

    /// Open a new record even if the item is already stocked
    #[arg(long)]
    pub create: bool,
}

#[derive(Debug, Args)]
pub struct RemoveArgs {
    pub name_or_id: String,

    /// Taken as an absolute value
    #[arg(default_value_t = 1, allow_negative_numbers = true)]
    pub amount: i64,

    /// Delete the record once its count drops below 1
    #[arg(long)]
    pub delete_if_zero: bool,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub name_or_id: String,

    /// Delete every record of the item instead of the last one
    #[arg(long)]
    pub delete_all: bool,
}

pub fn clear(
    args: ClearArgs,
    stockist: &mut SqliteStockist,
    printer: &Printer,
) -> anyhow::Result<()> {
    let confirmed = args.yes
        || printer
            .confirm("Clear all stock?")
            .context("Failed to read confirmation")?;
    if confirmed && outcome(printer, stockist.reset_database())?.is_some() {
        printer.verbose("Cleared.");
    }
    Ok(())
}

pub fn stock(
    args: StockArgs,
    stockist: &mut SqliteStockist,
    printer: &Printer,
) -> anyhow::Result<()> {
    let Some(key) = outcome(printer, StockKey::parse(&args.name_or_id))? else {
        return Ok(());
    };
    let (item, stock_id) = match key {
        StockKey::Id(id) => (None, Some(id)),
        StockKey::Item(item) => (Some(item), None),
    };
    let stocked = stockist.stock_item(item.as_ref(), stock_id, args.amount, args.create, true);
    if let Some(id) = outcome(printer, stocked)? {
        show_record(stockist, printer, id);
    }
    Ok(())
}

pub fn remove(
    args: RemoveArgs,
    stockist: &mut SqliteStockist,
    printer: &Printer,
) -> anyhow::Result<()> {
    let Some(key) = outcome(printer, StockKey::parse(&args.name_or_id))? else {
        return Ok(());
    };
    let Some(id) = target_id(stockist, key) else {
        printer.verbose("Not present.");
        return Ok(());
    };

    let amount = -args.amount.saturating_abs();
    let Some(count) = outcome(printer, stockist.increase_stock(id, amount, true))? else {
        return Ok(());
    };
    if count < 1 && args.delete_if_zero {
        if outcome(printer, stockist.delete_stock_entry(id, true))?.is_some() {
            printer.verbose("Deleted.");
        }
    } else {
        show_record(stockist, printer, id);
    }
    Ok(())
}

pub fn delete(
    args: DeleteArgs,
    stockist: &mut SqliteStockist,
    printer: &Printer,
) -> anyhow::Result<()> {
    let Some(key) = outcome(printer, StockKey::parse(&args.name_or_id))? else {
        return Ok(());
    };
    let key = match key {
        StockKey::Item(item) if args.delete_all => StockKey::Item(item),
        other => match target_id(stockist, other) {
            Some(id) => StockKey::Id(id),
            None => {
                printer.verbose("Not present.");
                return Ok(());
            }
        },
    };
    if let Some(removed) = outcome(printer, stockist.remove(key, true))? {
        printer.verbose(format!("Deleted {}.", removed.len()));
    }
    Ok(())
}

/// An id as given, or the last record of an item
fn target_id(stockist: &SqliteStockist, key: StockKey) -> Option<StockId> {
    match key {
        StockKey::Id(id) => Some(id),
        StockKey::Item(item) => stockist.last_stock_id_for_item(&item),
    }
}

fn show_record(stockist: &SqliteStockist, printer: &Printer, stock_id: StockId) {
    if let Ok(record) = stockist.get(stock_id) {
        printer.verbose(format!("{}: {}", record.unique_name, record.count));
    }
}
