//! Evaluator output as received at the oracle boundary

use crate::{MetalCategory, RawDimension, TestabilityBundle};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Evaluator's structural classification (seed or edge)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuralFlag {
    /// Whether the evaluator classified the content this way
    #[serde(alias = "is_seed", alias = "is_edge")]
    pub flagged: bool,
    /// Justification text
    pub justification: Option<String>,
}

/// Everything the evaluator returns for one submission
///
/// Every field is defaulted so that a partially formed response still
/// deserializes; shape repair happens in the normalizer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorOutput {
    /// Raw novelty dimension
    pub novelty: RawDimension,
    /// Raw density dimension
    pub density: RawDimension,
    /// Raw coherence dimension
    pub coherence: RawDimension,
    /// Raw alignment dimension
    pub alignment: RawDimension,
    /// Evaluator's own composite total (recomputed regardless)
    pub composite_total: RawDimension,
    /// Redundancy overlap percentage against prior submissions
    #[serde(alias = "redundancy_overlap_percent")]
    pub overlap_percent: RawDimension,
    /// Penalty percentage applied when overlap is excessive
    #[serde(alias = "redundancy_penalty_percent")]
    pub overlap_penalty_percent: RawDimension,
    /// Seed classification
    #[serde(deserialize_with = "lenient_flag")]
    pub seed: Option<StructuralFlag>,
    /// Edge classification
    #[serde(deserialize_with = "lenient_flag")]
    pub edge: Option<StructuralFlag>,
    /// Optional testability bundle
    #[serde(deserialize_with = "lenient_bundle")]
    pub testability: Option<TestabilityBundle>,
    /// Metal categories the evaluator recommends
    #[serde(deserialize_with = "lenient_metals")]
    pub recommended_metals: Vec<MetalCategory>,
}

/// Accept metal names in any case, silently dropping unknown entries
fn lenient_metals<'de, D>(deserializer: D) -> Result<Vec<MetalCategory>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let mut metals = Vec::new();
    if let Value::Array(items) = value {
        for item in items {
            if let Some(metal) = item.as_str().and_then(MetalCategory::parse) {
                if !metals.contains(&metal) {
                    metals.push(metal);
                }
            }
        }
    }
    Ok(metals)
}

/// Parse a value, treating a malformed one as absent
fn lenient_value<T: DeserializeOwned>(value: Value) -> Option<T> {
    serde_json::from_value(value).ok()
}

/// Accept a bundle record or a bare array of claim bridges
fn lenient_bundle<'de, D>(deserializer: D) -> Result<Option<TestabilityBundle>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(_) => lenient_value(value).map(TestabilityBundle::new),
        Value::Object(_) => lenient_value(value),
        _ => None,
    })
}

/// Accept either a bare boolean or a full flag record
fn lenient_flag<'de, D>(deserializer: D) -> Result<Option<StructuralFlag>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(flagged) => Some(StructuralFlag {
            flagged,
            justification: None,
        }),
        other => lenient_value(other),
    })
}
