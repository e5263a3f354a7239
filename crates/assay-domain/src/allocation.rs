//! Allocation records and ledger outcomes

use crate::{Epoch, MetalBalance, MetalCategory, SubmissionId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an allocation based on UUIDv7
///
/// UUIDv7 gives chronological sortability, so allocation history reads
/// in commit order without a separate sequence column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AllocationId(u128);

impl AllocationId {
    /// Generate a new UUIDv7-based AllocationId
    ///
    /// # Examples
    ///
    /// ```
    /// use assay_domain::AllocationId;
    ///
    /// let id = AllocationId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create an AllocationId from a raw u128 value
    ///
    /// This is primarily for storage layer deserialization.
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse an AllocationId from a UUID string
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid UUIDv7 string: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for AllocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AllocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// An award drawn from one metal pool for one submission
///
/// Append-only. At most one record exists per (submission, metal) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRecord {
    /// Unique identifier
    pub id: AllocationId,
    /// Submission the award is for
    pub submission_id: SubmissionId,
    /// Contributor receiving the award
    pub contributor_id: String,
    /// Metal pool drawn from
    pub metal: MetalCategory,
    /// Epoch owning the pool
    pub epoch: Epoch,
    /// Reward amount
    pub amount: u64,
    /// Tier multiplier applied
    pub tier_multiplier: f64,
    /// Category-combination amplification applied
    pub amplification: f64,
    /// Pool balance immediately before the deduction
    pub balance_before: u64,
    /// Pool balance immediately after the deduction
    pub balance_after: u64,
    /// Commit time (milliseconds since Unix epoch)
    pub allocated_at: u64,
}

/// An allocation about to be committed
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationDraft {
    /// Submission the award is for
    pub submission_id: SubmissionId,
    /// Contributor receiving the award
    pub contributor_id: String,
    /// Epoch owning the pool
    pub epoch: Epoch,
    /// Metal pool to draw from
    pub metal: MetalCategory,
    /// Amount to deduct, at most half the pool's balance at commit time
    pub amount: u64,
    /// Tier multiplier applied
    pub tier_multiplier: f64,
    /// Category-combination amplification applied
    pub amplification: f64,
}

/// Outcome of an atomic check-and-deduct
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeductOutcome {
    /// Balance reduced by exactly the requested amount
    Deducted {
        /// Balance before the deduction
        balance_before: u64,
        /// Balance after the deduction
        balance_after: u64,
    },
    /// Balance too low; left untouched
    InsufficientReserve {
        /// Amount requested
        requested: u64,
        /// Balance available at the time of the check
        available: u64,
    },
    /// The epoch has not been opened yet; balance untouched
    EpochClosed,
}

/// Outcome of committing an allocation
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// Deduction and record committed together
    Committed(AllocationRecord),
    /// Amount exceeds the allocatable half of the pool; nothing committed
    InsufficientReserve {
        /// Amount requested
        requested: u64,
        /// Allocatable amount at the time of the check
        available: u64,
    },
    /// A record already exists for this (submission, metal); nothing committed
    AlreadyAllocated,
    /// The epoch has not been opened yet; nothing committed
    EpochClosed,
}

/// Lifetime running totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningTotals {
    /// Sum of every successful deduction
    pub total_distributed: u64,
    /// Number of committed allocation records
    pub allocation_count: u64,
    /// Number of open epochs (a prefix of the epoch order)
    pub open_epochs: u8,
}

impl RunningTotals {
    /// Epochs currently open, in order
    pub fn open_epoch_list(&self) -> Vec<Epoch> {
        Epoch::ALL
            .iter()
            .copied()
            .filter(|e| e.is_open_within(self.open_epochs))
            .collect()
    }
}

/// Point-in-time view of the whole ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Every pool, ordered by epoch then metal
    pub balances: Vec<MetalBalance>,
    /// Running totals
    pub totals: RunningTotals,
}

impl LedgerSnapshot {
    /// Sum of all remaining balances
    pub fn total_remaining(&self) -> u64 {
        self.balances.iter().map(|b| b.balance).sum()
    }
}
