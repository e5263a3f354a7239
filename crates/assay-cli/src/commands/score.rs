//! Score command implementation.

use crate::cli::ScoreArgs;
use crate::commands::{build_pipeline, open_ledger, read_input};
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use assay_domain::traits::ScoreStore;
use assay_evaluator::parse_evaluation;

/// Execute the score command.
pub fn execute_score(args: ScoreArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let raw = read_input(args.input.as_deref())?;

    // Same lenient parsing the evaluator applies to oracle replies
    let output = parse_evaluation(&raw);

    let pipeline = build_pipeline(config)?;
    let record = pipeline.score_with_hint(args.submission_id.as_str(), &output, args.hint.as_deref())?;

    if args.save {
        open_ledger(config)?.save_score_record(&record)?;
        if !formatter.is_json() {
            eprintln!("{}", formatter.success("Score record saved"));
        }
    }

    println!("{}", formatter.format_score_record(&record)?);
    Ok(())
}
