//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{
    AllocationDraft, AllocationRecord, CommitOutcome, DeductOutcome, Epoch, EvaluatorOutput,
    Genesis, LedgerSnapshot, MetalBalance, MetalCategory, RunningTotals, ScoreRecord, SubmissionId,
};

/// Trait for the external text-evaluation oracle
///
/// Implemented by the infrastructure layer (assay-evaluator)
pub trait Evaluator {
    /// Error type for transport-level failures
    ///
    /// Malformed response *content* is not an error; it degrades to defaults.
    type Error;

    /// Evaluate a submission's text
    fn evaluate(&self, text: &str, category_hint: Option<&str>) -> Result<EvaluatorOutput, Self::Error>;
}

/// Trait for persisting score records
///
/// Implemented by the infrastructure layer (assay-store)
pub trait ScoreStore {
    /// Error type for store operations
    type Error;

    /// Persist a score record, keyed by its submission id
    ///
    /// Saving an identical record twice is a no-op; saving a different record
    /// under an existing id is an error.
    fn save_score_record(&self, record: &ScoreRecord) -> Result<(), Self::Error>;

    /// Load a score record by submission id
    fn get_score_record(&self, id: &SubmissionId) -> Result<Option<ScoreRecord>, Self::Error>;
}

/// Trait for the epoch ledger holding every metal reserve
///
/// All balance mutation goes through `try_deduct` or `commit_allocation`,
/// each of which is a single atomic check-then-write.
///
/// Implemented by the infrastructure layer (assay-store)
pub trait EpochLedger {
    /// Error type for ledger operations
    type Error;

    /// Seed every pool from genesis, opening the first epoch
    ///
    /// Returns `false` without changing anything if the ledger was already seeded.
    fn initialize(&self, genesis: &Genesis) -> Result<bool, Self::Error>;

    /// Open the next epoch in order
    ///
    /// Returns the epoch opened, or `None` if every epoch is already open.
    fn open_next_epoch(&self) -> Result<Option<Epoch>, Self::Error>;

    /// Current state of one pool
    fn balance(&self, epoch: Epoch, metal: MetalCategory) -> Result<MetalBalance, Self::Error>;

    /// Atomically deduct `amount` from one pool
    fn try_deduct(&self, epoch: Epoch, metal: MetalCategory, amount: u64)
        -> Result<DeductOutcome, Self::Error>;

    /// Whether an allocation already exists for (submission, metal)
    fn has_allocation(&self, submission_id: &SubmissionId, metal: MetalCategory)
        -> Result<bool, Self::Error>;

    /// Atomically enforce uniqueness, deduct, and append the allocation record
    ///
    /// The draft amount may not exceed half of the pool's balance as read
    /// inside the same transaction; a larger draft is `InsufficientReserve`.
    fn commit_allocation(&self, draft: &AllocationDraft) -> Result<CommitOutcome, Self::Error>;

    /// Every allocation recorded for a submission
    fn allocations_for(&self, submission_id: &SubmissionId)
        -> Result<Vec<AllocationRecord>, Self::Error>;

    /// Lifetime running totals
    fn totals(&self) -> Result<RunningTotals, Self::Error>;

    /// All pools plus running totals
    fn snapshot(&self) -> Result<LedgerSnapshot, Self::Error>;

    /// Epochs currently open, in order
    fn open_epochs(&self) -> Result<Vec<Epoch>, Self::Error> {
        Ok(self.totals()?.open_epoch_list())
    }
}

/// Receiver of committed allocations (settlement, anchoring, audit)
///
/// Called only after the allocation is durably committed.
pub trait AllocationNotifier {
    /// Handle a committed allocation
    fn notify(&self, record: &AllocationRecord);
}
