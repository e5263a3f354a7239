//! Evaluate command implementation.

use crate::cli::EvaluateArgs;
use crate::commands::{build_pipeline, open_ledger, read_input};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use assay_domain::traits::ScoreStore;
use assay_evaluator::OllamaEvaluator;

/// Execute the evaluate command.
pub async fn execute_evaluate(
    args: EvaluateArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let text = read_input(args.input.as_deref())?;
    if text.trim().is_empty() {
        return Err(CliError::InvalidInput("Submission text is empty".to_string()));
    }

    let mut evaluator_config = config.evaluator.clone();
    if let Some(model) = args.model {
        evaluator_config.model = model;
    }
    if let Some(endpoint) = args.endpoint {
        evaluator_config.endpoint = endpoint;
    }
    evaluator_config.validate().map_err(CliError::Config)?;

    let pipeline = build_pipeline(config)?;
    let evaluator = OllamaEvaluator::from_config(&evaluator_config);
    let output = evaluator.evaluate(&text, args.hint.as_deref()).await?;
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
