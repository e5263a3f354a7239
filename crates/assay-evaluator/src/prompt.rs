//! Prompt construction for the evaluation oracle

/// Shape the oracle is asked to reply with
const RESPONSE_SHAPE: &str = r#"{
  "novelty": <number 0-2500>,
  "density": <number 0-2500>,
  "coherence": <number 0-2500>,
  "alignment": <number 0-2500>,
  "composite_total": <number 0-10000>,
  "overlap_percent": <number -100 to 100, redundancy against prior work>,
  "overlap_penalty_percent": <number 0-100, applied only when overlap is excessive>,
  "seed": {"is_seed": <bool>, "justification": "<text>"},
  "edge": {"is_edge": <bool>, "justification": "<text>"},
  "testability": {"claim_bridges": [{
    "claim_id": "<id>",
    "regime": "<where the claim applies>",
    "observables": ["<measurable quantity>"],
    "differential_prediction": "<what this predicts that alternatives do not>",
    "falsification_condition": "<observation that would refute it>",
    "boundary_constraints": ["<limit of validity>"]
  }]},
  "recommended_metals": ["gold" | "silver" | "copper"]
}"#;

/// Build the evaluation prompt for a submission
///
/// # Examples
///
/// ```
/// use assay_evaluator::build_prompt;
///
/// let prompt = build_prompt("A new proof", Some("mathematics"));
/// assert!(prompt.contains("A new proof"));
/// assert!(prompt.contains("mathematics"));
/// ```
pub fn build_prompt(text: &str, category_hint: Option<&str>) -> String {
    let category = category_hint
        .map(str::trim)
        .filter(|hint| !hint.is_empty())
        .unwrap_or("unspecified");

    format!(
        "You are evaluating a research contribution.\n\
         Score it on four dimensions (novelty, density, coherence, alignment), \
         each from 0 to 2500. Report its redundancy overlap with prior work as a percentage. \
         Say whether it is a seed (an irreducible new primitive) or an edge \
         (a bridge between existing domains), with justification. \
         Extract its falsifiable claims as claim bridges.\n\n\
         Category: {category}\n\n\
         Submission:\n\"\"\"\n{text}\n\"\"\"\n\n\
         Reply with a single JSON object and nothing else, in this shape:\n{RESPONSE_SHAPE}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_text_and_hint() {
        let prompt = build_prompt("Entropy bound for qubits", Some("physics"));
        assert!(prompt.contains("Entropy bound for qubits"));
        assert!(prompt.contains("Category: physics"));
        assert!(prompt.contains("\"recommended_metals\""));
    }

    #[test]
    fn test_missing_hint() {
        assert!(build_prompt("x", None).contains("Category: unspecified"));
        assert!(build_prompt("x", Some("   ")).contains("Category: unspecified"));
    }
}
