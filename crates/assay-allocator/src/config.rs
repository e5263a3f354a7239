//! Configuration for the allocation orchestrator

use assay_domain::Epoch;
use assay_scorer::DEFAULT_CONFIG_VERSION;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::AllocationError;

/// Reward multiplier applied per qualification epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierMultipliers {
    /// Founder epoch
    pub founder: f64,
    /// Pioneer epoch
    pub pioneer: f64,
    /// Community epoch
    pub community: f64,
    /// Ecosystem epoch
    pub ecosystem: f64,
}

impl Default for TierMultipliers {
    fn default() -> Self {
        Self {
            founder: 1.0,
            pioneer: 0.9,
            community: 0.8,
            ecosystem: 0.7,
        }
    }
}

impl TierMultipliers {
    /// Multiplier for the given epoch
    pub fn for_epoch(&self, epoch: Epoch) -> f64 {
        match epoch {
            Epoch::Founder => self.founder,
            Epoch::Pioneer => self.pioneer,
            Epoch::Community => self.community,
            Epoch::Ecosystem => self.ecosystem,
        }
    }
}

/// Configuration for the allocator
///
/// # Examples
///
/// ```
/// use assay_allocator::AllocatorConfig;
/// use assay_domain::Epoch;
///
/// let config = AllocatorConfig::default();
/// assert!(config.verify_integrity);
/// assert_eq!(config.tier_multipliers.for_epoch(Epoch::Pioneer), 0.9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocatorConfig {
    /// Configuration version a score record must carry to be allocated
    pub expected_config_version: String,

    /// Recompute and compare the integrity hash before allocating
    pub verify_integrity: bool,

    /// Per-epoch reward multipliers
    pub tier_multipliers: TierMultipliers,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            expected_config_version: DEFAULT_CONFIG_VERSION.to_string(),
            verify_integrity: true,
            tier_multipliers: TierMultipliers::default(),
        }
    }
}

impl AllocatorConfig {
    /// Accept records scored under another configuration version
    pub fn for_version(version: impl Into<String>) -> Self {
        Self {
            expected_config_version: version.into(),
            ..Self::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.expected_config_version.trim().is_empty() {
            return Err("expected_config_version must not be empty".to_string());
        }
        for epoch in Epoch::ALL {
            let multiplier = self.tier_multipliers.for_epoch(epoch);
            if !multiplier.is_finite() || multiplier < 0.0 {
                return Err(format!(
                    "tier multiplier for {} must be a non-negative number",
                    epoch
                ));
            }
        }
        Ok(())
    }

    /// Parse from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }

    /// Load and validate a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AllocationError> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&contents).map_err(AllocationError::Config)?;
        config.validate().map_err(AllocationError::Config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AllocatorConfig::default();
        assert_eq!(config.expected_config_version, "assay-scoring-v1");
        assert!(config.validate().is_ok());
        assert_eq!(config.tier_multipliers.for_epoch(Epoch::Founder), 1.0);
        assert_eq!(config.tier_multipliers.for_epoch(Epoch::Ecosystem), 0.7);
    }

    #[test]
    fn test_partial_toml_falls_back() {
        let config = AllocatorConfig::from_toml(
            r#"
            verify_integrity = false

            [tier_multipliers]
            pioneer = 0.5
            "#,
        )
        .unwrap();
        assert!(!config.verify_integrity);
        assert_eq!(config.tier_multipliers.pioneer, 0.5);
        assert_eq!(config.tier_multipliers.founder, 1.0);
        assert_eq!(config.expected_config_version, DEFAULT_CONFIG_VERSION);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = AllocatorConfig::for_version("assay-scoring-v2");
        let parsed = AllocatorConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_negative_multiplier_rejected() {
        let mut config = AllocatorConfig::default();
        config.tier_multipliers.community = -0.1;
        assert!(config.validate().is_err());

        let config = AllocatorConfig::for_version("  ");
        assert!(config.validate().is_err());
    }
}
