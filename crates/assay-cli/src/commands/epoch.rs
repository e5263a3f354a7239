//! Epoch command implementation.

use crate::cli::{EpochArgs, EpochCommand};
use crate::commands::open_ledger;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use assay_domain::traits::EpochLedger;

/// Execute the epoch command.
pub fn execute_epoch(args: EpochArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let ledger = open_ledger(config)?;

    match args.command {
        EpochCommand::OpenNext => match ledger.open_next_epoch()? {
            Some(epoch) => println!("{}", formatter.success(&format!("Opened epoch: {}", epoch))),
            None => println!("{}", formatter.info("Every epoch is already open")),
        },
    }

    Ok(())
}
