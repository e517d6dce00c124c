//! Command implementations

pub mod report;
pub mod settings;
pub mod stock;

use clap::Subcommand;
use stockist_core::errors::StockError;
use stockist_store::SqliteStockist;

use crate::printer::Printer;

/// Commands that work on the opened ledger
#[derive(Debug, Subcommand)]
pub enum LedgerCommand {
    /// Empty the stock table
    Clear(stock::ClearArgs),
    /// List every item with its records
    Listall,
    /// List the records of one item
    Listname(report::ListnameArgs),
    /// Show the count of an id, or of every record of an item
    Count(report::CountArgs),
    /// Add stock to an id or an item
    Stock(stock::StockArgs),
    /// Take stock from an id or the last record of an item
    Remove(stock::RemoveArgs),
    /// Delete an id, the last record of an item, or all of its records
    Delete(stock::DeleteArgs),
    /// Print the stock as an SQL script
    Export,
}

pub fn execute(
    command: LedgerCommand,
    stockist: &mut SqliteStockist,
    printer: &Printer,
) -> anyhow::Result<()> {
    match command {
        LedgerCommand::Clear(args) => stock::clear(args, stockist, printer),
        LedgerCommand::Listall => report::listall(stockist, printer),
        LedgerCommand::Listname(args) => report::listname(args, stockist, printer),
        LedgerCommand::Count(args) => report::count(args, stockist, printer),
        LedgerCommand::Stock(args) => stock::stock(args, stockist, printer),
        LedgerCommand::Remove(args) => stock::remove(args, stockist, printer),
        LedgerCommand::Delete(args) => stock::delete(args, stockist, printer),
        LedgerCommand::Export => report::export(stockist, printer),
    }
}

/// Message shown for a ledger error the user can act on
///
/// `None` for failures that end the command with an error exit.
pub fn user_message(err: &StockError) -> Option<&'static str> {
    match err {
        StockError::Locked { .. } => Some("Locked."),
        StockError::NotFound { .. } | StockError::ItemNotFound { .. } => Some("Not found."),
        StockError::NoConnection => Some("No database!"),
        StockError::DuplicateId { .. } => Some("ID already in use."),
        StockError::InvalidItem { .. } => Some("Invalid item."),
        StockError::InvalidValue { .. } => Some("Invalid value."),
        StockError::NotImplemented { .. }
        | StockError::Persistence { .. }
        | StockError::CorruptRow { .. } => None,
    }
}

/// Print the user message for an expected failure, propagate the rest
///
/// # Errors
///
/// Returns the error when [`user_message`] has nothing for it.
pub fn outcome<T>(
    printer: &Printer,
    result: stockist_core::Result<T>,
) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) => match user_message(&err) {
            Some(message) => {
                tracing::debug!(error = %err, "Command refused");
                printer.warn(message);
                Ok(None)
            }
            None => Err(err.into()),
        },
    }
}
