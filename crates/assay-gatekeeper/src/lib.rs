//! Assay Gatekeeper
//!
//! Validates testability bundles before their verdict feeds the precision index.
//!
//! The Gatekeeper checks every claim bridge for:
//! - Completeness (regime and observables present)
//! - Predictiveness (a non-tautological differential prediction)
//! - Falsifiability (a non-tautological failure condition)
//! - Non-degeneracy (soft: boundary constraints present)
//!
//! A missing bundle is not an error. It yields a failed verdict with the
//! maximal degeneracy penalty.
//!
//! # Examples
//!
//! ```
//! use assay_gatekeeper::{Gatekeeper, ValidationConfig};
//!
//! let gatekeeper = Gatekeeper::new(ValidationConfig::default());
//! let verdict = gatekeeper.validate(None);
//! assert_eq!(verdict.degeneracy_penalty, 1.0);
//! ```

#![warn(missing_docs)]

mod validator;
mod error;
mod config;

pub use validator::{BridgeIssue, Gatekeeper, ValidationReport};
pub use error::GatekeeperError;
pub use config::ValidationConfig;
