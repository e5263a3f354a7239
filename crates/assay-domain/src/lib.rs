//! Assay Domain Layer
//!
//! This crate contains the domain model shared by every other Assay crate:
//! value objects, the fixed epoch/metal taxonomy, genesis constants, and the
//! trait interfaces that the infrastructure crates implement.
//!
//! ## Key Concepts
//!
//! - **DimensionSet**: four bounded quality dimensions produced once per submission
//! - **TestabilityBundle**: claim bridges with falsifiable predictions
//! - **ScoreRecord**: the immutable, hash-sealed output of the scoring pipeline
//! - **Epoch**: one of four ordered qualification tiers, each owning three metal pools
//! - **AllocationRecord**: an append-only award drawn from one metal pool
//!
//! ## Architecture
//!
//! - Only serialization and identifier crates as dependencies
//! - Pure business rules only (thresholds, halving, genesis arithmetic)
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod allocation;
pub mod dimension;
pub mod epoch;
pub mod evaluation;
pub mod genesis;
pub mod metal;
pub mod precision;
pub mod score;
pub mod testability;
pub mod traits;

// Re-exports for convenience
pub use allocation::{
    AllocationDraft, AllocationId, AllocationRecord, CommitOutcome, DeductOutcome,
    LedgerSnapshot, RunningTotals,
};
pub use dimension::{DimensionSet, NestedDimension, RawDimension, RawScalar, DIMENSION_MAX};
pub use epoch::Epoch;
pub use evaluation::{EvaluatorOutput, StructuralFlag};
pub use genesis::Genesis;
pub use metal::{MetalBalance, MetalCategory, MetalRecommendation};
pub use precision::{PrecisionResult, PrecisionTier};
pub use score::{Classification, ModifierTrace, OverlapPolicy, ScoreRecord, SubmissionId};
pub use testability::{CheckStatus, ClaimBridge, TestabilityBundle, ValidityVerdict, VerdictOutcome};
