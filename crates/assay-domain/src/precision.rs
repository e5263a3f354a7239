//! Precision index and its tier bands

use serde::{Deserialize, Serialize};

/// Maximum precision index
pub const PRECISION_INDEX_MAX: u8 = 16;

/// Coarse tier label derived from the precision index
///
/// Distinct from the qualification epoch: this is a coherence-and-validity
/// classification, not an allocation tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrecisionTier {
    /// Index below 3
    Community,
    /// Index 3 through 7
    Copper,
    /// Index 8 through 12
    Silver,
    /// Index 13 and above
    Gold,
}

impl PrecisionTier {
    /// Map a floored precision index to its tier
    pub fn from_index(index: u8) -> Self {
        match index {
            0..=2 => PrecisionTier::Community,
            3..=7 => PrecisionTier::Copper,
            8..=12 => PrecisionTier::Silver,
            _ => PrecisionTier::Gold,
        }
    }

    /// Get the tier name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            PrecisionTier::Community => "community",
            PrecisionTier::Copper => "copper",
            PrecisionTier::Silver => "silver",
            PrecisionTier::Gold => "gold",
        }
    }
}

/// Result of coupling coherence with the validity verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecisionResult {
    /// Floored precision index n̂ in `0..=16`
    pub index: u8,
    /// Un-floored index, used for the bubble class fraction
    pub raw_index: f64,
    /// Bubble class label such as `"B7.4"`
    pub bubble_class: String,
    /// Coarse tier
    pub tier: PrecisionTier,
    /// Inconsistency penalty that produced this result
    pub inconsistency_penalty: f64,
}
