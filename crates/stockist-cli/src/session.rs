//! Startup: global flags, stored defaults and the opened ledger

use std::path::PathBuf;

use clap::Args;
use stockist_store::SqliteStockist;
use tracing::warn;

use crate::config::Defaults;
use crate::printer::Printer;

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Report what each command did
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Show settings and structured logs
    #[arg(long, global = true)]
    pub debug: bool,

    /// Suppress all normal output
    #[arg(long, global = true)]
    pub silent: bool,

    /// Refuse every stock mutation
    #[arg(long, global = true)]
    pub lock: bool,

    /// SQLite store path
    #[arg(long, global = true)]
    pub database: Option<String>,

    /// Settings file (default: ~/.stockistconfig)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Effective settings: flags OR-ed with stored defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database: String,
    pub verbose: bool,
    pub debug: bool,
    pub silent: bool,
    pub lock: bool,
}

impl Settings {
    pub fn resolve(globals: &GlobalArgs, defaults: &Defaults) -> Self {
        Self {
            database: globals
                .database
                .clone()
                .unwrap_or_else(|| defaults.database.clone()),
            verbose: globals.verbose || defaults.verbose,
            debug: globals.debug || defaults.debug,
            silent: globals.silent || defaults.silent,
            lock: globals.lock || defaults.lock,
        }
    }

    pub fn printer(&self) -> Printer {
        Printer {
            silent: self.silent,
            verbose: self.verbose,
            debug: self.debug,
        }
    }
}

fn connect(database: &str) -> stockist_core::Result<SqliteStockist> {
    let mut stockist = SqliteStockist::new(database)?;
    stockist.create_database()?;
    stockist.update_stock_from_db(false)?;
    Ok(stockist)
}

/// Open the store, pull its rows and apply the lock flag
///
/// A store that cannot be opened is reported as "No database!" and the
/// command runs against an empty, detached ledger.
pub fn open_stockist(settings: &Settings, printer: &Printer) -> SqliteStockist {
    let mut stockist = connect(&settings.database).unwrap_or_else(|err| {
        warn!(database = %settings.database, error = %err, "Store unavailable");
        printer.warn("No database!");
        SqliteStockist::detached()
    });
    stockist.set_locked(settings.lock);

    printer.debug(format!("Database set to {}.", settings.database));
    printer.debug(format!("Verbose set to {}.", settings.verbose));
    printer.debug(format!("Debug set to {}.", settings.debug));
    stockist
}
