//! Verify command implementation.

use crate::cli::VerifyArgs;
use crate::commands::open_ledger;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use assay_domain::traits::ScoreStore;
use assay_domain::SubmissionId;
use assay_scorer::verify_record;

/// Execute the verify command.
pub fn execute_verify(args: VerifyArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let ledger = open_ledger(config)?;
    let submission_id = SubmissionId::new(args.submission_id);

    let record = ledger
        .get_score_record(&submission_id)?
        .ok_or_else(|| CliError::NotFound(format!("No score record for {}", submission_id)))?;

    let valid = verify_record(&record)?;

    if formatter.is_json() {
        let report = serde_json::json!({
            "submission_id": submission_id,
            "integrity_hash": record.integrity_hash,
            "valid": valid,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if valid {
        println!(
            "{}",
            formatter.success(&format!("Integrity verified: {}", record.integrity_hash))
        );
    }

    if !valid {
        return Err(CliError::IntegrityMismatch(submission_id.to_string()));
    }
    Ok(())
}
