//! Gatekeeper configuration

use serde::{Deserialize, Serialize};

/// Phrasings that say nothing testable
const DEFAULT_TAUTOLOGICAL_PHRASES: &[&str] = &[
    "may vary",
    "might vary",
    "could vary",
    "may change",
    "might change",
    "could change",
    "depends on",
    "it depends",
    "results may differ",
    "to be determined",
    "tbd",
    "n/a",
    "unknown",
    "varies",
    "something will happen",
    "anything could happen",
];

/// Configuration for testability validation rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Phrases that mark a prediction or failure condition as tautological
    pub tautological_phrases: Vec<String>,

    /// Statements with at most this many words are tautological when they
    /// contain a listed phrase; longer statements only when they equal one
    pub short_statement_words: usize,

    /// Enable the soft boundary-constraint (non-degeneracy) check
    pub require_boundary_constraints: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            tautological_phrases: DEFAULT_TAUTOLOGICAL_PHRASES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            short_statement_words: 6,
            require_boundary_constraints: true,
        }
    }
}

impl ValidationConfig {
    /// Create a permissive configuration (no soft check, exact-match tautologies only)
    pub fn permissive() -> Self {
        Self {
            short_statement_words: 0,
            require_boundary_constraints: false,
            ..Self::default()
        }
    }

    /// Create a strict configuration (longer statements screened for tautologies)
    pub fn strict() -> Self {
        Self {
            short_statement_words: 12,
            require_boundary_constraints: true,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.tautological_phrases.iter().any(|p| p.trim().is_empty()) {
            return Err("tautological_phrases must not contain empty phrases".to_string());
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
}
