//! Result of one allocation call

use assay_domain::{AllocationRecord, Epoch, MetalCategory, SubmissionId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a category produced no allocation record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclineReason {
    /// Pool balance too low for the computed reward
    InsufficientReserve,
    /// A record already exists for this (submission, metal)
    AlreadyAllocated,
    /// The qualifying epoch has not been opened
    EpochClosed,
    /// Composite total below every qualification threshold
    NotQualified,
    /// Computed reward floored to zero
    ZeroReward,
}

impl DeclineReason {
    /// Stable snake_case name
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclineReason::InsufficientReserve => "insufficient_reserve",
            DeclineReason::AlreadyAllocated => "already_allocated",
            DeclineReason::EpochClosed => "epoch_closed",
            DeclineReason::NotQualified => "not_qualified",
            DeclineReason::ZeroReward => "zero_reward",
        }
    }
}

impl fmt::Display for DeclineReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A category skipped during allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declined {
    /// Metal category skipped
    pub metal: MetalCategory,
    /// Why it was skipped
    pub reason: DeclineReason,
}

/// Overall allocation state of a submission after one call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStatus {
    /// Every requested category holds an allocation
    Allocated,
    /// Some requested categories hold an allocation
    Partial,
    /// No requested category holds an allocation; eligible for retry
    Unallocated,
}

/// Outcome of `Allocator::allocate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationReport {
    /// Submission allocated for
    pub submission_id: SubmissionId,
    /// Epoch drawn from, if the record qualified
    pub epoch: Option<Epoch>,
    /// Amplification applied to every category
    pub amplification: f64,
    /// Records committed by this call, in category order
    pub records: Vec<AllocationRecord>,
    /// Categories skipped by this call, in category order
    pub declined: Vec<Declined>,
    /// Overall state, counting allocations made by earlier calls
    pub status: AllocationStatus,
}

impl AllocationReport {
    /// Sum of amounts committed by this call
    pub fn total_amount(&self) -> u64 {
        self.records.iter().map(|r| r.amount).sum()
    }

    /// Derive the overall status from committed and declined categories
    ///
    /// A category declined as `AlreadyAllocated` counts as held.
    pub(crate) fn status_for(records: &[AllocationRecord], declined: &[Declined]) -> AllocationStatus {
        let held = records.len()
            + declined
                .iter()
                .filter(|d| d.reason == DeclineReason::AlreadyAllocated)
                .count();
        let requested = records.len() + declined.len();

        if held == 0 {
            AllocationStatus::Unallocated
        } else if held == requested {
            AllocationStatus::Allocated
        } else {
            AllocationStatus::Partial
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declined(metal: MetalCategory, reason: DeclineReason) -> Declined {
        Declined { metal, reason }
    }

    #[test]
    fn test_status_unallocated() {
        let status = AllocationReport::status_for(
            &[],
            &[declined(MetalCategory::Gold, DeclineReason::InsufficientReserve)],
        );
        assert_eq!(status, AllocationStatus::Unallocated);
        assert_eq!(AllocationReport::status_for(&[], &[]), AllocationStatus::Unallocated);
    }

    #[test]
    fn test_status_already_allocated_counts_as_held() {
        let status = AllocationReport::status_for(
            &[],
            &[
                declined(MetalCategory::Gold, DeclineReason::AlreadyAllocated),
                declined(MetalCategory::Silver, DeclineReason::AlreadyAllocated),
            ],
        );
        assert_eq!(status, AllocationStatus::Allocated);

        let status = AllocationReport::status_for(
            &[],
            &[
                declined(MetalCategory::Gold, DeclineReason::AlreadyAllocated),
                declined(MetalCategory::Silver, DeclineReason::EpochClosed),
            ],
        );
        assert_eq!(status, AllocationStatus::Partial);
    }

    #[test]
    fn test_reason_names() {
        assert_eq!(DeclineReason::ZeroReward.to_string(), "zero_reward");
        assert_eq!(
            serde_json::to_string(&DeclineReason::InsufficientReserve).unwrap(),
            "\"insufficient_reserve\""
        );
    }
}
