//! Composite scoring with overlap bands and structural multipliers

use assay_domain::{DimensionSet, ModifierTrace, OverlapPolicy};

use crate::ScoringConfig;

/// Inputs to the composite arithmetic
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeInput {
    /// Normalized dimensions
    pub dimensions: DimensionSet,
    /// Signed overlap percentage
    pub overlap_percent: f64,
    /// Evaluator-supplied penalty percentage
    pub overlap_penalty_percent: f64,
    /// Seed classification
    pub seed: bool,
    /// Edge classification
    pub edge: bool,
}

/// Computes the bounded composite total
#[derive(Debug, Clone)]
pub struct CompositeScorer {
    config: ScoringConfig,
}

impl CompositeScorer {
    /// Create a scorer with the given configuration
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Select the single overlap policy for an overlap value
    ///
    /// The excessive band is checked first; the sweet-spot band lies
    /// strictly below it, so at most one band can match.
    pub fn overlap_policy(&self, overlap_percent: f64, penalty_percent: f64) -> OverlapPolicy {
        if overlap_percent >= self.config.excessive_overlap_threshold {
            OverlapPolicy::ExcessivePenalty {
                percent: penalty_percent.clamp(0.0, 100.0),
            }
        } else if overlap_percent >= self.config.sweet_spot_low
            && overlap_percent <= self.config.sweet_spot_high
        {
            OverlapPolicy::SweetSpotBonus {
                percent: overlap_percent,
            }
        } else {
            OverlapPolicy::Neutral
        }
    }

    /// Compute the composite total and the trace that produced it
    pub fn compute(&self, input: &CompositeInput) -> (u32, ModifierTrace) {
        let base_sum = input.dimensions.sum();
        let overlap_policy = self.overlap_policy(input.overlap_percent, input.overlap_penalty_percent);
        let seed_multiplier = if input.seed { self.config.seed_multiplier } else { 1.0 };
        let edge_multiplier = if input.edge { self.config.edge_multiplier } else { 1.0 };

        let unclamped_total = base_sum * overlap_policy.factor() * seed_multiplier * edge_multiplier;
        let total = if unclamped_total.is_finite() {
            unclamped_total.clamp(0.0, self.config.composite_max).round() as u32
        } else {
            0
        };

        let trace = ModifierTrace {
            base_sum,
            overlap_percent: input.overlap_percent,
            overlap_policy,
            seed_multiplier,
            edge_multiplier,
            unclamped_total,
        };

        (total, trace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(overlap: f64, penalty: f64, seed: bool, edge: bool) -> CompositeInput {
        CompositeInput {
            dimensions: DimensionSet::new(2000.0, 2000.0, 2000.0, 2000.0),
            overlap_percent: overlap,
            overlap_penalty_percent: penalty,
            seed,
            edge,
        }
    }

    #[test]
    fn test_sweet_spot_bonus() {
        let scorer = CompositeScorer::new(ScoringConfig::default());
        let (total, trace) = scorer.compute(&input(15.0, 0.0, false, false));
        assert_eq!(total, 9200);
        assert_eq!(trace.overlap_policy, OverlapPolicy::SweetSpotBonus { percent: 15.0 });
        assert_eq!(trace.base_sum, 8000.0);
    }

    #[test]
    fn test_excessive_penalty_uses_supplied_percent() {
        let scorer = CompositeScorer::new(ScoringConfig::default());
        let (total, trace) = scorer.compute(&input(40.0, 20.0, false, false));
        assert_eq!(total, 6400);
        assert_eq!(trace.overlap_policy, OverlapPolicy::ExcessivePenalty { percent: 20.0 });
    }

    #[test]
    fn test_band_edges() {
        let scorer = CompositeScorer::new(ScoringConfig::default());
        assert_eq!(scorer.overlap_policy(9.2, 0.0), OverlapPolicy::SweetSpotBonus { percent: 9.2 });
        assert_eq!(scorer.overlap_policy(19.2, 0.0), OverlapPolicy::SweetSpotBonus { percent: 19.2 });
        assert_eq!(scorer.overlap_policy(9.1, 0.0), OverlapPolicy::Neutral);
        assert_eq!(scorer.overlap_policy(25.0, 50.0), OverlapPolicy::Neutral);
        assert_eq!(scorer.overlap_policy(30.0, 50.0), OverlapPolicy::ExcessivePenalty { percent: 50.0 });
        assert_eq!(scorer.overlap_policy(-40.0, 50.0), OverlapPolicy::Neutral);
    }

    #[test]
    fn test_seed_and_edge_compose() {
        let scorer = CompositeScorer::new(ScoringConfig::default());
        let mut both = input(0.0, 0.0, true, true);
        both.dimensions = DimensionSet::new(1000.0, 1000.0, 1000.0, 1000.0);
        let (total, trace) = scorer.compute(&both);
        // 4000 × 1.3225
        assert_eq!(total, 5290);
        assert_eq!(trace.seed_multiplier, 1.15);
        assert_eq!(trace.edge_multiplier, 1.15);
    }

    #[test]
    fn test_total_clamped() {
        let scorer = CompositeScorer::new(ScoringConfig::default());
        let mut maxed = input(19.0, 0.0, true, true);
        maxed.dimensions = DimensionSet::new(2500.0, 2500.0, 2500.0, 2500.0);
        let (total, trace) = scorer.compute(&maxed);
        assert_eq!(total, 10_000);
        assert!(trace.unclamped_total > 10_000.0);
    }
}
