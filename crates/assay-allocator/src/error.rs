//! Error types for allocation

use thiserror::Error;

/// Errors that abort an allocation call
///
/// Normal operating states (exhausted reserve, duplicate attempt, closed
/// epoch, unqualified score) are reported as declines, not errors.
#[derive(Error, Debug)]
pub enum AllocationError {
    /// No metal categories were requested
    #[error("At least one metal category is required")]
    EmptyCategorySet,

    /// Record was scored under a different configuration version
    #[error("Configuration version mismatch: expected {expected}, found {found}")]
    ConfigurationVersionMismatch {
        /// Version the allocator accepts
        expected: String,
        /// Version stamped on the record
        found: String,
    },

    /// Stored integrity hash does not match the record contents
    #[error("Integrity check failed for submission: {0}")]
    IntegrityMismatch(String),

    /// Ledger error
    #[error("Ledger error: {0}")]
    Ledger(String),

    /// Integrity hash could not be recomputed
    #[error("Scorer error: {0}")]
    Scorer(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error while loading configuration
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
