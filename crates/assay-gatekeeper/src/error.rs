//! Gatekeeper error types

use thiserror::Error;

/// Errors that can occur during gatekeeper setup
///
/// Validation itself never fails; a bad bundle is a verdict, not an error.
#[derive(Error, Debug)]
pub enum GatekeeperError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
