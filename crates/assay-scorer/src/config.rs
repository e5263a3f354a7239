//! Configuration for the scoring pipeline

use assay_domain::DIMENSION_MAX;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ScorerError;

/// Default configuration-version identifier stamped on every record
pub const DEFAULT_CONFIG_VERSION: &str = "assay-scoring-v1";

/// Scoring constants
///
/// Every field feeds the integrity hash through `version`, so changing any
/// constant without bumping the version makes old records unverifiable
/// against the new configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Configuration-version identifier
    pub version: String,

    /// Overlap at or above this percentage is excessive
    pub excessive_overlap_threshold: f64,

    /// Lower edge of the sweet-spot band (inclusive)
    pub sweet_spot_low: f64,

    /// Upper edge of the sweet-spot band (inclusive)
    pub sweet_spot_high: f64,

    /// Multiplier for seed content
    pub seed_multiplier: f64,

    /// Multiplier for edge content
    pub edge_multiplier: f64,

    /// Upper bound for each dimension
    pub dimension_max: f64,

    /// Upper bound for the composite total
    pub composite_max: f64,

    /// How far one dimension pair must exceed the other to dominate the metal heuristic
    pub metal_dominance_ratio: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_CONFIG_VERSION.to_string(),
            excessive_overlap_threshold: 30.0,
            sweet_spot_low: 9.2,
            sweet_spot_high: 19.2,
            seed_multiplier: 1.15,
            edge_multiplier: 1.15,
            dimension_max: DIMENSION_MAX,
            composite_max: 10_000.0,
            metal_dominance_ratio: 1.2,
        }
    }
}

impl ScoringConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.version.trim().is_empty() {
            return Err("version must not be empty".to_string());
        }
        let numeric = [
            self.excessive_overlap_threshold,
            self.sweet_spot_low,
            self.sweet_spot_high,
            self.seed_multiplier,
            self.edge_multiplier,
            self.dimension_max,
            self.composite_max,
            self.metal_dominance_ratio,
        ];
        if numeric.iter().any(|v| !v.is_finite()) {
            return Err("numeric settings must be finite".to_string());
        }
        if self.sweet_spot_low > self.sweet_spot_high {
            return Err("sweet_spot_low must not exceed sweet_spot_high".to_string());
        }
        if self.sweet_spot_high >= self.excessive_overlap_threshold {
            return Err("sweet-spot band must lie below excessive_overlap_threshold".to_string());
        }
        if self.seed_multiplier <= 0.0 || self.edge_multiplier <= 0.0 {
            return Err("seed and edge multipliers must be positive".to_string());
        }
        if self.dimension_max <= 0.0 || self.dimension_max > DIMENSION_MAX {
            return Err(format!("dimension_max must be in (0, {}]", DIMENSION_MAX));
        }
        if self.composite_max <= 0.0 || self.composite_max > u32::MAX as f64 {
            return Err("composite_max must be positive and fit in u32".to_string());
        }
        if self.metal_dominance_ratio < 1.0 {
            return Err("metal_dominance_ratio must be at least 1.0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }

    /// Load and validate configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScorerError> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&contents).map_err(ScorerError::Config)?;
        config.validate().map_err(ScorerError::Config)?;
        Ok(config)
    }
}
