//! Terminal output
//!
//! Every line the CLI shows goes through [`Printer`], so `--silent` is a
//! single switch here.

use std::io::{self, BufRead, Write};

use stockist_core::StockRecord;

const RULE: &str = "====================";

#[derive(Debug, Clone, Copy, Default)]
pub struct Printer {
    pub silent: bool,
    pub verbose: bool,
    pub debug: bool,
}

impl Printer {
    /// Normal output
    pub fn out(&self, message: impl AsRef<str>) {
        if !self.silent {
            println!("{}", message.as_ref());
        }
    }

    /// Problem the user can act on ("Not found.", "Locked.")
    pub fn warn(&self, message: impl AsRef<str>) {
        if !self.silent {
            eprintln!("{}", message.as_ref());
        }
    }

    /// Output shown only with `--verbose`
    pub fn verbose(&self, message: impl AsRef<str>) {
        if self.verbose {
            self.out(message);
        }
    }

    /// Output shown only with `--debug`
    pub fn debug(&self, message: impl AsRef<str>) {
        if self.debug {
            self.out(message);
        }
    }

    /// `> unique_name: count`
    pub fn record(&self, record: &StockRecord) {
        self.out(format!("> {}: {}", record.unique_name, record.count));
    }

    /// An item heading followed by its records
    pub fn item_block<'a>(&self, item: &str, records: impl IntoIterator<Item = &'a StockRecord>) {
        self.out("");
        self.out(RULE);
        self.out(item);
        self.out(RULE);
        for record in records {
            self.record(record);
        }
        self.out(RULE);
        self.out("");
    }

    /// Ask a yes/no question on stdin; anything but `y`/`yes` is a no
    ///
    /// # Errors
    ///
    /// Fails if stdin or stdout cannot be used.
    pub fn confirm(&self, question: &str) -> io::Result<bool> {
        print!("{} [y/N]: ", question);
        io::stdout().flush()?;
        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(matches!(
            answer.trim().to_ascii_lowercase().as_str(),
            "y" | "yes"
        ))
    }
}
