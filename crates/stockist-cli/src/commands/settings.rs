//! Settings commands: set, reset, defaults

use clap::Args;

use crate::config::{ConfigFile, Defaults};
use crate::printer::Printer;

#[derive(Debug, Args)]
pub struct SetArgs {
    /// One of database, verbose, debug, silent, lock
    pub name: String,
    pub value: String,
}

pub fn set(args: SetArgs, config: &ConfigFile, printer: &Printer) -> anyhow::Result<()> {
    let mut defaults = config.load()?;
    if let Err(err) = defaults.set(&args.name, &args.value) {
        printer.warn(err.to_string());
        return Ok(());
    }
    config.save(&defaults)?;
    printer.debug(format!("Set {} to {}.", args.name, args.value));
    Ok(())
}

pub fn reset(config: &ConfigFile, printer: &Printer) -> anyhow::Result<()> {
    config.reset()?;
    printer.verbose("Defaults reset.");
    Ok(())
}

pub fn defaults(defaults: &Defaults, printer: &Printer) -> anyhow::Result<()> {
    for (name, value) in defaults.entries() {
        printer.out(format!("{}: {}", name, value));
    }
    Ok(())
}
