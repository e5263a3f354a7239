//! Score records - the sealed output of the scoring pipeline

use crate::{DimensionSet, Epoch, MetalCategory, MetalRecommendation, PrecisionResult, ValidityVerdict};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller-supplied submission identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(String);

impl SubmissionId {
    /// Wrap a caller-supplied identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubmissionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SubmissionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Which overlap policy applied to a submission
///
/// Exactly one policy applies; the bands are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Overlap outside both bands
    Neutral,
    /// Overlap in the sweet-spot band; composite scaled by `1 + percent/100`
    SweetSpotBonus {
        /// Bonus percentage (equal to the overlap)
        percent: f64,
    },
    /// Excessive overlap; composite scaled by `1 - percent/100`
    ExcessivePenalty {
        /// Penalty percentage supplied by the evaluator
        percent: f64,
    },
}

impl OverlapPolicy {
    /// Multiplicative factor this policy applies to the composite
    pub fn factor(&self) -> f64 {
        match self {
            OverlapPolicy::Neutral => 1.0,
            OverlapPolicy::SweetSpotBonus { percent } => 1.0 + percent / 100.0,
            OverlapPolicy::ExcessivePenalty { percent } => 1.0 - percent / 100.0,
        }
    }
}

/// Full trace of the arithmetic that produced a composite total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifierTrace {
    /// Sum of the four dimensions before modifiers
    pub base_sum: f64,
    /// Redundancy overlap percentage reported by the evaluator
    pub overlap_percent: f64,
    /// Overlap policy that applied
    pub overlap_policy: OverlapPolicy,
    /// Seed multiplier (1.0 when not a seed)
    pub seed_multiplier: f64,
    /// Edge multiplier (1.0 when not an edge)
    pub edge_multiplier: f64,
    /// Total after all modifiers, before clamping and rounding
    pub unclamped_total: f64,
}

/// An evaluator-supplied structural classification with its justification
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Whether the classification applies
    pub flagged: bool,
    /// Evaluator's justification text
    pub justification: Option<String>,
}

/// The immutable result of scoring one submission
///
/// `integrity_hash` covers every other field, including `config_version`,
/// so any party holding the inputs can recompute and verify the total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Caller-supplied submission identifier
    pub submission_id: SubmissionId,
    /// Configuration version the record was computed under
    pub config_version: String,
    /// Normalized dimensions
    pub dimensions: DimensionSet,
    /// Final composite total in `0..=10000`
    pub composite_total: u32,
    /// Modifier trace
    pub modifiers: ModifierTrace,
    /// Seed (irreducible generative primitive) classification
    pub seed: Classification,
    /// Edge (boundary/interaction operator) classification
    pub edge: Classification,
    /// Precision coupling result
    pub precision: PrecisionResult,
    /// Validity verdict, present only when a bundle was supplied
    pub validity: Option<ValidityVerdict>,
    /// Qualification epoch, or `None` when unqualified
    pub qualification: Option<Epoch>,
    /// Metal recommendation
    pub metal_recommendation: MetalRecommendation,
    /// Metal categories the recommendation expands to
    pub recommended_metals: Vec<MetalCategory>,
    /// Hex-encoded SHA-256 over every field above
    pub integrity_hash: String,
}

impl ScoreRecord {
    /// Whether the record qualifies for any epoch
    pub fn is_qualified(&self) -> bool {
        self.qualification.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_factors() {
        assert_eq!(OverlapPolicy::Neutral.factor(), 1.0);
        assert_eq!(OverlapPolicy::SweetSpotBonus { percent: 15.0 }.factor(), 1.15);
        assert_eq!(OverlapPolicy::ExcessivePenalty { percent: 20.0 }.factor(), 0.8);
    }

    #[test]
    fn test_overlap_policy_serialization() {
        let json = serde_json::to_string(&OverlapPolicy::SweetSpotBonus { percent: 12.5 }).unwrap();
        assert_eq!(json, r#"{"policy":"sweet_spot_bonus","percent":12.5}"#);
    }

    #[test]
    fn test_submission_id_display() {
        let id = SubmissionId::from("sub-001");
        assert_eq!(id.to_string(), "sub-001");
        assert_eq!(id.as_str(), "sub-001");
    }
}
