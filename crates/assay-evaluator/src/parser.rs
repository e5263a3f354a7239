//! Lenient parsing of oracle reply text

use assay_domain::EvaluatorOutput;
use tracing::warn;

/// Remove a surrounding markdown code fence, if any
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string (e.g. "json") on the opening fence line
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Slice out the outermost JSON object in the text
pub fn extract_json_object(text: &str) -> Option<&str> {
    let text = strip_code_fences(text);
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Parse oracle reply text into an `EvaluatorOutput`
///
/// Never fails: text without a usable JSON object yields the default
/// output, whose dimensions all normalize to 0.
///
/// # Examples
///
/// ```
/// use assay_evaluator::parse_evaluation;
/// use assay_domain::{EvaluatorOutput, RawDimension};
///
/// let output = parse_evaluation("```json\n{\"novelty\": 12}\n```");
/// assert_eq!(output.novelty, RawDimension::Number(12.0));
/// assert_eq!(parse_evaluation("no json here"), EvaluatorOutput::default());
/// ```
pub fn parse_evaluation(text: &str) -> EvaluatorOutput {
    let Some(candidate) = extract_json_object(text) else {
        warn!(length = text.len(), "Oracle reply contained no JSON object; using defaults");
        return EvaluatorOutput::default();
    };

    match serde_json::from_str::<EvaluatorOutput>(candidate) {
        Ok(output) => output,
        Err(e) => {
            warn!(error = %e, "Oracle reply was not valid JSON; using defaults");
            EvaluatorOutput::default()
        }
    }
}
