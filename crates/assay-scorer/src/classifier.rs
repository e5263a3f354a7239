//! Qualification and metal recommendation

use assay_domain::{DimensionSet, Epoch, MetalCategory, MetalRecommendation};

/// Hint fragments that mark a contribution as development-leaning
const DEVELOPMENT_MARKERS: &[&str] = &["develop", "code", "software", "engineering"];

/// Qualification epoch for a composite total, highest threshold first
pub fn qualify(total: u32) -> Option<Epoch> {
    Epoch::qualify(total)
}

/// Heuristic metal recommendation
///
/// A development-leaning category hint wins outright. Otherwise whichever
/// dimension pair exceeds the other by `dominance_ratio` decides, and a
/// balanced profile is Hybrid.
pub fn recommend_metal(
    dimensions: &DimensionSet,
    category_hint: Option<&str>,
    dominance_ratio: f64,
) -> MetalRecommendation {
    if let Some(hint) = category_hint {
        let hint = hint.to_lowercase();
        if DEVELOPMENT_MARKERS.iter().any(|marker| hint.contains(marker)) {
            return MetalRecommendation::Silver;
        }
    }

    let discovery = dimensions.discovery_weight();
    let integration = dimensions.integration_weight();

    if discovery > dominance_ratio * integration {
        MetalRecommendation::Gold
    } else if integration > dominance_ratio * discovery {
        MetalRecommendation::Copper
    } else {
        MetalRecommendation::Hybrid
    }
}

/// Final recommendation and metal set for a record
///
/// Metals named by the evaluator take precedence over the heuristic.
pub fn resolve_metals(
    oracle_metals: &[MetalCategory],
    dimensions: &DimensionSet,
    category_hint: Option<&str>,
    dominance_ratio: f64,
) -> (MetalRecommendation, Vec<MetalCategory>) {
    let mut metals: Vec<MetalCategory> = Vec::with_capacity(oracle_metals.len());
    for metal in oracle_metals {
        if !metals.contains(metal) {
            metals.push(*metal);
        }
    }

    if metals.is_empty() {
        let recommendation = recommend_metal(dimensions, category_hint, dominance_ratio);
        (recommendation, recommendation.metals())
    } else {
        (MetalRecommendation::from_metals(&metals), metals)
    }
}
