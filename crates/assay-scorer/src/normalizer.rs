//! Score normalization
//!
//! Resolves whatever shape the evaluator returned into bounded numbers.
//! Nothing here fails: an unusable value becomes 0.

use assay_domain::{
    Classification, DimensionSet, EvaluatorOutput, RawDimension, RawScalar, StructuralFlag,
};
use tracing::warn;

/// Bounds for the signed overlap percentage
pub const OVERLAP_RANGE: (f64, f64) = (-100.0, 100.0);

/// Bounds for the penalty percentage
pub const PENALTY_RANGE: (f64, f64) = (0.0, 100.0);

/// Evaluator output after normalization
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedOutput {
    /// Clamped dimensions
    pub dimensions: DimensionSet,
    /// Overlap percentage in `[-100, 100]`
    pub overlap_percent: f64,
    /// Penalty percentage in `[0, 100]`
    pub overlap_penalty_percent: f64,
    /// Seed classification
    pub seed: Classification,
    /// Edge classification
    pub edge: Classification,
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

fn parse_numeric(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().and_then(finite)
}

fn scalar_value(scalar: &RawScalar) -> Option<f64> {
    match scalar {
        RawScalar::Number(n) => finite(*n),
        RawScalar::Text(s) => parse_numeric(s),
        RawScalar::Other(_) => None,
    }
}

/// Extract a number from a raw dimension
///
/// Priority: direct number, nested `final`, nested `score`, nested `base`,
/// then a numeric string.
pub fn extract_value(raw: &RawDimension) -> Option<f64> {
    match raw {
        RawDimension::Number(n) => finite(*n),
        RawDimension::Nested(nested) => [&nested.final_value, &nested.score, &nested.base]
            .into_iter()
            .flatten()
            .find_map(scalar_value),
        RawDimension::Text(s) => parse_numeric(s),
        RawDimension::Missing | RawDimension::Unrecognized(_) => None,
    }
}

fn normalize_bounded(name: &str, raw: &RawDimension, low: f64, high: f64) -> f64 {
    match extract_value(raw) {
        Some(value) => value.clamp(low, high),
        None => {
            if *raw != RawDimension::Missing {
                warn!(field = name, raw = ?raw, "Unusable evaluator value; defaulting to 0");
            } else {
                warn!(field = name, "Evaluator value missing; defaulting to 0");
            }
            0.0
        }
    }
}

/// Normalize one dimension into `[0, max]`
pub fn normalize_dimension(name: &str, raw: &RawDimension, max: f64) -> f64 {
    normalize_bounded(name, raw, 0.0, max)
}

/// Normalize the four dimensions
pub fn normalize_dimensions(output: &EvaluatorOutput, max: f64) -> DimensionSet {
    DimensionSet::new(
        normalize_dimension("novelty", &output.novelty, max),
        normalize_dimension("density", &output.density, max),
        normalize_dimension("coherence", &output.coherence, max),
        normalize_dimension("alignment", &output.alignment, max),
    )
}

fn classification(flag: &Option<StructuralFlag>) -> Classification {
    flag.as_ref()
        .map(|f| Classification {
            flagged: f.flagged,
            justification: f.justification.clone(),
        })
        .unwrap_or_default()
}

/// Normalize the complete evaluator output
pub fn normalize(output: &EvaluatorOutput, dimension_max: f64) -> NormalizedOutput {
    let overlap_percent = match extract_value(&output.overlap_percent) {
        Some(value) => value.clamp(OVERLAP_RANGE.0, OVERLAP_RANGE.1),
        None => 0.0,
    };
    // Only consulted in the excessive band, so absence is not worth a warning
    let overlap_penalty_percent = match extract_value(&output.overlap_penalty_percent) {
        Some(value) => value.clamp(PENALTY_RANGE.0, PENALTY_RANGE.1),
        None => 0.0,
    };

    NormalizedOutput {
        dimensions: normalize_dimensions(output, dimension_max),
        overlap_percent,
        overlap_penalty_percent,
        seed: classification(&output.seed),
        edge: classification(&output.edge),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_raw() -> impl Strategy<Value = RawDimension> {
        prop_oneof![
            proptest::num::f64::ANY.prop_map(RawDimension::Number),
            ".*".prop_map(RawDimension::Text),
            proptest::num::f64::ANY.prop_map(|v| RawDimension::Text(v.to_string())),
            Just(RawDimension::Missing),
        ]
    }

    proptest! {
        /// Property: normalization never leaves [0, 2500]
        #[test]
        fn test_normalized_dimension_bounded(raw in arb_raw()) {
            let value = normalize_dimension("p", &raw, 2500.0);
            prop_assert!((0.0..=2500.0).contains(&value));
        }
    }
}
