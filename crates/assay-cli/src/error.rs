//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage error
    #[error("Store error: {0}")]
    Store(#[from] assay_store::StoreError),

    /// Scoring error
    #[error("Scoring error: {0}")]
    Scorer(#[from] assay_scorer::ScorerError),

    /// Allocation error
    #[error("Allocation error: {0}")]
    Allocation(#[from] assay_allocator::AllocationError),

    /// Evaluator transport error
    #[error("Evaluator error: {0}")]
    Evaluator(#[from] assay_evaluator::EvaluatorError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Stored record failed integrity verification
    #[error("Integrity check failed for submission: {0}")]
    IntegrityMismatch(String),

    /// Requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),
}
