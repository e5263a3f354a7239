//! Error types for the scoring pipeline

use thiserror::Error;

/// Errors that can occur while scoring
///
/// Malformed evaluator content is never an error; it normalizes to zero.
#[derive(Error, Debug)]
pub enum ScorerError {
    /// Evaluator transport failure
    #[error("Evaluator error: {0}")]
    Evaluator(String),

    /// Record could not be serialized for hashing
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
