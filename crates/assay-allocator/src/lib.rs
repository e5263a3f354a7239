//! Assay Allocator
//!
//! Turns qualified score records into awards drawn from the epoch ledger's
//! metal pools.
//!
//! # Overview
//!
//! For each requested metal category the allocator:
//! - Rejects repeats for the same (submission, metal) before touching any balance
//! - Computes `floor((total / 10000) × balance / 2 × amplification × tier_multiplier)`
//! - Commits deduction and record in one ledger transaction
//! - Notifies downstream collaborators only after the commit
//!
//! ## Category amplification
//!
//! | Categories | Amplification |
//! |------------|---------------|
//! | Gold + Silver + Copper | 1.5 |
//! | Gold + Silver | 1.25 |
//! | Gold + Copper | 1.2 |
//! | Silver + Copper | 1.15 |
//! | any single category | 1.0 |
//!
//! # Configuration
//!
//! ```toml
//! [allocation]
//! expected_config_version = "assay-scoring-v1"
//! verify_integrity = true
//!
//! [allocation.tier_multipliers]
//! founder = 1.0
//! pioneer = 0.9
//! community = 0.8
//! ecosystem = 0.7
//! ```
//!
//! # Metrics
//!
//! ```no_run
//! # use assay_allocator::{Allocator, AllocatorConfig};
//! # use assay_store::SqliteLedger;
//! # use std::sync::Arc;
//! # let ledger = Arc::new(SqliteLedger::new("assay.db").unwrap());
//! let allocator = Allocator::new(ledger, AllocatorConfig::default());
//! println!("{}", allocator.metrics().summary());
//! ```

#![warn(missing_docs)]

mod error;
mod config;
mod metrics;
mod notifier;
mod orchestrator;
mod report;
pub mod reward;

pub use error::AllocationError;
pub use config::{AllocatorConfig, TierMultipliers};
pub use metrics::AllocationMetrics;
pub use notifier::{ChannelNotifier, TracingNotifier};
pub use orchestrator::Allocator;
pub use report::{AllocationReport, AllocationStatus, DeclineReason, Declined};
