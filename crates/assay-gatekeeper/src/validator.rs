//! Testability bundle validation logic

use assay_domain::{CheckStatus, ClaimBridge, TestabilityBundle, ValidityVerdict, VerdictOutcome};
use tracing::debug;

use crate::{GatekeeperError, ValidationConfig};

/// Verdict plus the per-bridge issues that produced it
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// The aggregate verdict
    pub verdict: ValidityVerdict,

    /// Issues found, in bridge order
    pub issues: Vec<BridgeIssue>,
}

/// A problem found on a single claim bridge
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeIssue {
    /// No testability bundle (or an empty one) was supplied
    MissingBundle,

    /// Regime or observables absent
    Incomplete {
        /// Claim the bridge belongs to
        claim_id: String,
    },

    /// Differential prediction empty or tautological
    NonPredictive {
        /// Claim the bridge belongs to
        claim_id: String,
        /// The offending text
        statement: String,
    },

    /// Falsification condition empty or tautological
    Unfalsifiable {
        /// Claim the bridge belongs to
        claim_id: String,
        /// The offending text
        statement: String,
    },

    /// No boundary constraints stated
    MissingBoundary {
        /// Claim the bridge belongs to
        claim_id: String,
    },
}

/// The Gatekeeper validates testability bundles
pub struct Gatekeeper {
    config: ValidationConfig,
}

impl Gatekeeper {
    /// Create a new Gatekeeper with the given configuration
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Create a Gatekeeper after checking the configuration
    pub fn try_new(config: ValidationConfig) -> Result<Self, GatekeeperError> {
        config.validate().map_err(GatekeeperError::Config)?;
        Ok(Self::new(config))
    }

    /// Create a Gatekeeper with default configuration
    pub fn default_config() -> Self {
        Self::new(ValidationConfig::default())
    }

    /// Validate an optional bundle, returning only the verdict
    pub fn validate(&self, bundle: Option<&TestabilityBundle>) -> ValidityVerdict {
        self.inspect(bundle).verdict
    }

    /// Validate an optional bundle, keeping the issues found
    ///
    /// A missing or empty bundle fails every check with the maximal penalty.
    pub fn inspect(&self, bundle: Option<&TestabilityBundle>) -> ValidationReport {
        let bridges = match bundle {
            Some(bundle) if !bundle.is_empty() => &bundle.claim_bridges,
            _ => {
                debug!("No testability bundle supplied");
                return ValidationReport {
                    verdict: ValidityVerdict::missing(),
                    issues: vec![BridgeIssue::MissingBundle],
                };
            }
        };

        let mut issues = Vec::new();
        let mut complete = true;
        let mut predictive = true;
        let mut falsifiable = true;
        let mut missing_boundary = 0usize;
        let mut degenerate_statements = 0usize;

        for bridge in bridges {
            if !is_complete(bridge) {
                complete = false;
                issues.push(BridgeIssue::Incomplete {
                    claim_id: bridge.claim_id.clone(),
                });
            }

            let prediction_ok = self.is_substantive(&bridge.differential_prediction);
            if !prediction_ok {
                predictive = false;
                issues.push(BridgeIssue::NonPredictive {
                    claim_id: bridge.claim_id.clone(),
                    statement: bridge.differential_prediction.clone(),
                });
            }

            let falsification_ok = self.is_substantive(&bridge.falsification_condition);
            if !falsification_ok {
                falsifiable = false;
                issues.push(BridgeIssue::Unfalsifiable {
                    claim_id: bridge.claim_id.clone(),
                    statement: bridge.falsification_condition.clone(),
                });
            }

            if !prediction_ok || !falsification_ok {
                degenerate_statements += 1;
            }

            if !has_boundary(bridge) {
                missing_boundary += 1;
                if self.config.require_boundary_constraints {
                    issues.push(BridgeIssue::MissingBoundary {
                        claim_id: bridge.claim_id.clone(),
                    });
                }
            }
        }

        let hard = [complete, predictive, falsifiable];
        let passes = hard.iter().filter(|p| **p).count();
        let all_hard_pass = passes == hard.len();

        let non_degeneracy = if !self.config.require_boundary_constraints || missing_boundary == 0 {
            CheckStatus::Passed
        } else if all_hard_pass {
            CheckStatus::SoftFailed
        } else {
            CheckStatus::Failed
        };

        let total = bridges.len() as f64;
        let boundary_ratio = if self.config.require_boundary_constraints {
            missing_boundary as f64 / total
        } else {
            0.0
        };
        let statement_ratio = degenerate_statements as f64 / total;
        let degeneracy_penalty = (0.5 * boundary_ratio + 0.5 * statement_ratio).clamp(0.0, 1.0);

        let verdict = ValidityVerdict {
            completeness: status(complete),
            predictiveness: status(predictive),
            falsifiability: status(falsifiable),
            non_degeneracy,
            outcome: if all_hard_pass {
                VerdictOutcome::Passed
            } else {
                VerdictOutcome::Failed
            },
            testability_score: passes as f64 / hard.len() as f64,
            degeneracy_penalty,
        };

        debug!(
            bridges = bridges.len(),
            passes,
            degeneracy_penalty,
            issues = issues.len(),
            "Validated testability bundle"
        );

        ValidationReport { verdict, issues }
    }

    /// A statement is substantive when non-empty and not a stock tautology
    fn is_substantive(&self, statement: &str) -> bool {
        let normalized = statement
            .trim()
            .trim_end_matches(|c: char| c == '.' || c == '!' || c == '?')
            .to_lowercase();

        if normalized.is_empty() {
            return false;
        }

        let words = normalized.split_whitespace().count();
        !self.config.tautological_phrases.iter().any(|phrase| {
            let phrase = phrase.trim().to_lowercase();
            normalized == phrase
                || (words <= self.config.short_statement_words && normalized.contains(&phrase))
        })
    }
}

fn is_complete(bridge: &ClaimBridge) -> bool {
    !bridge.regime.trim().is_empty() && bridge.observables.iter().any(|o| !o.trim().is_empty())
}

fn has_boundary(bridge: &ClaimBridge) -> bool {
    bridge.boundary_constraints.iter().any(|b| !b.trim().is_empty())
}

fn status(passed: bool) -> CheckStatus {
    if passed {
        CheckStatus::Passed
    } else {
        CheckStatus::Failed
    }
}
