//! Read-only commands: listall, listname, count, export

use clap::Args;
use stockist_core::{ItemName, Lookup, StockKey};
use stockist_store::SqliteStockist;

use super::outcome;
use crate::printer::Printer;

#[derive(Debug, Args)]
pub struct ListnameArgs {
    pub name: String,
}

#[derive(Debug, Args)]
pub struct CountArgs {
    pub name_or_id: String,
}

pub fn listall(stockist: &SqliteStockist, printer: &Printer) -> anyhow::Result<()> {
    for (item, ids) in stockist.name_id_map() {
        let records = ids.keys().filter_map(|id| stockist.get(*id).ok());
        printer.item_block(item.as_str(), records);
    }
    Ok(())
}

pub fn listname(
    args: ListnameArgs,
    stockist: &SqliteStockist,
    printer: &Printer,
) -> anyhow::Result<()> {
    match ItemName::new(args.name) {
        Ok(item) if stockist.item_stocked(&item) => {
            printer.item_block(item.as_str(), stockist.stock_for_item(&item));
        }
        _ => printer.warn("Not found."),
    }
    Ok(())
}

pub fn count(args: CountArgs, stockist: &SqliteStockist, printer: &Printer) -> anyhow::Result<()> {
    let Some(key) = outcome(printer, StockKey::parse(&args.name_or_id))? else {
        return Ok(());
    };
    match outcome(printer, stockist.lookup(key))? {
        Some(Lookup::Record(record)) => printer.out(record.count.to_string()),
        Some(Lookup::Records(records)) if records.is_empty() => printer.warn("Not found."),
        Some(Lookup::Records(records)) => records.into_iter().for_each(|r| printer.record(r)),
        None => {}
    }
    Ok(())
}

pub fn export(stockist: &SqliteStockist, printer: &Printer) -> anyhow::Result<()> {
    printer.out(stockist.export_stock_to_sql());
    Ok(())
}
