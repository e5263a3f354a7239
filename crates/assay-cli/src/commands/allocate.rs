//! Allocate command implementation.

use crate::cli::AllocateArgs;
use crate::commands::open_ledger;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use assay_allocator::{Allocator, TracingNotifier};
use assay_domain::traits::ScoreStore;
use assay_domain::{MetalCategory, SubmissionId};
use std::sync::Arc;

/// Execute the allocate command.
pub fn execute_allocate(args: AllocateArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let ledger = Arc::new(open_ledger(config)?);
    let submission_id = SubmissionId::new(args.submission_id);

    let record = ledger
        .get_score_record(&submission_id)?
        .ok_or_else(|| CliError::NotFound(format!("No score record for {}", submission_id)))?;

    let metals: Vec<MetalCategory> = if args.metals.is_empty() {
        record.recommended_metals.clone()
    } else {
        args.metals.into_iter().map(Into::into).collect()
    };

    let mut allocator = Allocator::try_new(ledger, config.allocation.clone())?
        .with_notifier(TracingNotifier);
    let report = allocator.allocate(&record, &args.contributor, &metals)?;

    println!("{}", formatter.format_allocation_report(&report)?);
    Ok(())
}
