//! Ledger command implementation.

use crate::cli::{LedgerArgs, LedgerCommand};
use crate::commands::open_ledger;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use assay_domain::traits::EpochLedger;
use assay_domain::Genesis;

/// Execute the ledger command.
pub fn execute_ledger(args: LedgerArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let ledger = open_ledger(config)?;

    match args.command {
        LedgerCommand::Init { fixed_balance } => {
            let genesis = match fixed_balance {
                Some(balance) => Genesis::fixed(balance),
                None => Genesis::default(),
            };

            if ledger.initialize(&genesis)? {
                println!(
                    "{}",
                    formatter.success(&format!(
                        "Ledger seeded with {} units (founder epoch open)",
                        genesis.total_supply
                    ))
                );
            } else {
                println!("{}", formatter.warning("Ledger already seeded; genesis ignored"));
            }
        }
        LedgerCommand::Status => {
            let snapshot = ledger.snapshot()?;
            println!("{}", formatter.format_snapshot(&snapshot)?);
        }
    }

    Ok(())
}
