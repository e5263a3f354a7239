//! Testability bundles and the verdict derived from them

use serde::{Deserialize, Serialize};

/// A single claim bridge: one falsifiable prediction tied to a regime
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimBridge {
    /// Identifier of the claim this bridge supports
    pub claim_id: String,

    /// Named physical or logical regime the claim applies to
    pub regime: String,

    /// Observables the prediction is stated in terms of
    pub observables: Vec<String>,

    /// What the claim predicts that alternatives do not
    pub differential_prediction: String,

    /// Observation that would refute the claim
    pub falsification_condition: String,

    /// Boundary (floor) constraints limiting where the claim holds
    pub boundary_constraints: Vec<String>,
}

/// Ordered sequence of claim bridges submitted alongside a contribution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestabilityBundle {
    /// The claim bridges, in submission order
    #[serde(alias = "bridges")]
    pub claim_bridges: Vec<ClaimBridge>,
}

impl TestabilityBundle {
    /// Create a bundle from claim bridges
    pub fn new(claim_bridges: Vec<ClaimBridge>) -> Self {
        Self { claim_bridges }
    }

    /// Whether the bundle carries no bridges at all
    pub fn is_empty(&self) -> bool {
        self.claim_bridges.is_empty()
    }
}

/// Outcome of a single structural check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// Check passed for every claim bridge
    Passed,
    /// Check failed for at least one claim bridge
    Failed,
    /// Soft check flagged; contributes to the degeneracy penalty only
    SoftFailed,
}

impl CheckStatus {
    /// Whether this status counts as a pass
    pub fn is_pass(&self) -> bool {
        matches!(self, CheckStatus::Passed)
    }
}

/// Aggregate outcome across the three hard checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictOutcome {
    /// All hard checks passed across all claim bridges
    Passed,
    /// At least one hard check failed, or no bundle was supplied
    Failed,
}

/// Verdict produced by validating a testability bundle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidityVerdict {
    /// Every bridge names a regime and at least one observable
    pub completeness: CheckStatus,
    /// Differential predictions are present and not tautological
    pub predictiveness: CheckStatus,
    /// Falsification conditions are present and not tautological
    pub falsifiability: CheckStatus,
    /// Soft check: boundary constraints present when the hard checks pass
    pub non_degeneracy: CheckStatus,
    /// Aggregate outcome
    pub outcome: VerdictOutcome,
    /// Fraction of hard checks passed, in `[0, 1]`
    pub testability_score: f64,
    /// Degeneracy penalty, in `[0, 1]`
    pub degeneracy_penalty: f64,
}

impl ValidityVerdict {
    /// Verdict for a submission that carried no testability bundle
    ///
    /// Every check fails and the degeneracy penalty is maximal.
    pub fn missing() -> Self {
        Self {
            completeness: CheckStatus::Failed,
            predictiveness: CheckStatus::Failed,
            falsifiability: CheckStatus::Failed,
            non_degeneracy: CheckStatus::Failed,
            outcome: VerdictOutcome::Failed,
            testability_score: 0.0,
            degeneracy_penalty: 1.0,
        }
    }

    /// Whether the aggregate outcome is a pass
    pub fn passed(&self) -> bool {
        self.outcome == VerdictOutcome::Passed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_verdict() {
        let verdict = ValidityVerdict::missing();
        assert!(!verdict.passed());
        assert_eq!(verdict.degeneracy_penalty, 1.0);
        assert_eq!(verdict.testability_score, 0.0);
        assert!(!verdict.completeness.is_pass());
        assert!(!verdict.non_degeneracy.is_pass());
    }

    #[test]
    fn test_bundle_accepts_bridges_alias() {
        let json = r#"{"bridges": [{"claim_id": "c1", "regime": "low-energy"}]}"#;
        let bundle: TestabilityBundle = serde_json::from_str(json).unwrap();
        assert_eq!(bundle.claim_bridges.len(), 1);
        assert_eq!(bundle.claim_bridges[0].regime, "low-energy");
        assert!(bundle.claim_bridges[0].observables.is_empty());
    }
}
