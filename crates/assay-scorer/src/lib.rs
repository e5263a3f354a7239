//! Assay Scorer
//!
//! Turns noisy evaluator output into a bounded, reproducible, tamper-evident
//! score record.
//!
//! # Architecture
//!
//! ```text
//! EvaluatorOutput → Normalizer → Gatekeeper → Precision Coupler
//!                → Composite Scorer → Classifier → Integrity Seal → ScoreRecord
//! ```
//!
//! Every stage is a pure function of its inputs and the `ScoringConfig`.
//! No wall-clock or random input reaches the arithmetic.
//!
//! # Example Usage
//!
//! ```
//! use assay_domain::{Epoch, EvaluatorOutput};
//! use assay_scorer::{verify_record, ScoringPipeline};
//!
//! let output: EvaluatorOutput = serde_json::from_str(
//!     r#"{"novelty": 2000, "density": 2000, "coherence": 2000, "alignment": 2000,
//!         "overlap_percent": 15}"#,
//! ).unwrap();
//!
//! let pipeline = ScoringPipeline::default_pipeline();
//! let record = pipeline.score("sub-001", &output).unwrap();
//!
//! assert_eq!(record.composite_total, 9200);
//! assert_eq!(record.qualification, Some(Epoch::Founder));
//! assert!(verify_record(&record).unwrap());
//! ```

#![warn(missing_docs)]

mod error;
mod config;
pub mod normalizer;
pub mod precision;
pub mod composite;
pub mod classifier;
pub mod integrity;
mod pipeline;

#[cfg(test)]
mod tests;

pub use error::ScorerError;
pub use config::{ScoringConfig, DEFAULT_CONFIG_VERSION};
pub use precision::couple;
pub use composite::{CompositeInput, CompositeScorer};
pub use classifier::{qualify, recommend_metal, resolve_metals};
pub use integrity::{compute_integrity_hash, seal, verify_record};
pub use pipeline::ScoringPipeline;
