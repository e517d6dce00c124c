//! Stockist CLI
//!
//! Command-line interface for the stock ledger

use clap::{Parser, Subcommand};
use stockist_core::logging_facility::{init, Profile};

mod commands;
mod config;
mod printer;
mod session;

use config::ConfigFile;
use session::{GlobalArgs, Settings};

#[derive(Debug, Parser)]
#[command(name = "stockist")]
#[command(about = "Stockist - stock bookkeeping backed by SQLite", long_about = None)]
struct Cli {
    #[command(flatten)]
    globals: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Store a default setting
    Set(commands::settings::SetArgs),
    /// Forget every stored default
    Reset,
    /// Show the stored defaults
    Defaults,
    #[command(flatten)]
    Ledger(commands::LedgerCommand),
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ConfigFile::locate(cli.globals.config.clone())?;
    let defaults = config.load()?;
    let settings = Settings::resolve(&cli.globals, &defaults);
    if settings.debug {
        init(Profile::Development);
    }
    let printer = settings.printer();
    printer.verbose("Defaults initialised.");

    match cli.command {
        Commands::Set(args) => commands::settings::set(args, &config, &printer),
        Commands::Reset => commands::settings::reset(&config, &printer),
        Commands::Defaults => commands::settings::defaults(&defaults, &printer),
        Commands::Ledger(command) => {
            let mut stockist = session::open_stockist(&settings, &printer);
            commands::execute(command, &mut stockist, &printer)
        }
    }
}
