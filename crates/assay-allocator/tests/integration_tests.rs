//! Integration tests for assay-allocator
//!
//! These tests drive the allocator against a real SQLite ledger.

use assay_allocator::{
    AllocationError, AllocationStatus, Allocator, AllocatorConfig, ChannelNotifier, DeclineReason,
    Declined, TierMultipliers,
};
use assay_domain::traits::EpochLedger;
use assay_domain::{
    AllocationDraft, AllocationRecord, CommitOutcome, DeductOutcome, Epoch, EvaluatorOutput,
    Genesis, LedgerSnapshot, MetalBalance, MetalCategory, RunningTotals, ScoreRecord,
    SubmissionId,
};
use assay_scorer::ScoringPipeline;
use assay_store::{SqliteLedger, StoreError};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;

use MetalCategory::{Copper, Gold, Silver};

fn ledger(balance: u64) -> Arc<SqliteLedger> {
    let ledger = SqliteLedger::in_memory().unwrap();
    ledger.initialize(&Genesis::fixed(balance)).unwrap();
    Arc::new(ledger)
}

/// Record whose four dimensions all equal `each`, with no modifiers
fn record(id: &str, each: u32) -> ScoreRecord {
    let output: EvaluatorOutput = serde_json::from_value(serde_json::json!({
        "novelty": each,
        "density": each,
        "coherence": each,
        "alignment": each,
    }))
    .unwrap();
    ScoringPipeline::default_pipeline().score(id, &output).unwrap()
}

fn balance(ledger: &SqliteLedger, epoch: Epoch, metal: MetalCategory) -> u64 {
    ledger.balance(epoch, metal).unwrap().balance
}

#[test]
fn test_full_score_single_category() {
    let ledger = ledger(1_000_000);
    let mut allocator = Allocator::new(Arc::clone(&ledger), AllocatorConfig::default());
    let record = record("sub-d", 2500);
    assert_eq!(record.composite_total, 10_000);

    let report = allocator.allocate(&record, "alice", &[Gold]).unwrap();

    assert_eq!(report.status, AllocationStatus::Allocated);
    assert_eq!(report.epoch, Some(Epoch::Founder));
    assert_eq!(report.amplification, 1.0);
    assert_eq!(report.records.len(), 1);
    assert!(report.declined.is_empty());

    let allocation = &report.records[0];
    assert_eq!(allocation.amount, 500_000);
    assert_eq!(allocation.balance_before, 1_000_000);
    assert_eq!(allocation.balance_after, 500_000);
    assert_eq!(allocation.tier_multiplier, 1.0);
    assert_eq!(allocation.contributor_id, "alice");
    assert_eq!(balance(&ledger, Epoch::Founder, Gold), 500_000);
    assert_eq!(ledger.totals().unwrap().total_distributed, 500_000);
}

#[test]
fn test_amplification_capped_at_allocatable() {
    let ledger = ledger(1_000_000);
    let mut allocator = Allocator::new(Arc::clone(&ledger), AllocatorConfig::default());

    let report = allocator
        .allocate(&record("sub-cap", 2500), "alice", &[Gold, Silver])
        .unwrap();

    assert_eq!(report.amplification, 1.25);
    assert_eq!(report.records.len(), 2);
    assert!(report.records.iter().all(|r| r.amount == 500_000));
    assert!(report.records.iter().all(|r| r.amplification == 1.25));
    assert_eq!(report.total_amount(), 1_000_000);
}

#[test]
fn test_amplification_with_tier_multiplier() {
    let ledger = ledger(1_000_000);
    let config = AllocatorConfig {
        tier_multipliers: TierMultipliers {
            founder: 0.5,
            ..TierMultipliers::default()
        },
        ..AllocatorConfig::default()
    };
    let mut allocator = Allocator::new(Arc::clone(&ledger), config);

    let report = allocator
        .allocate(&record("sub-amp", 2500), "alice", &[Gold, Silver, Copper])
        .unwrap();

    // 1.0 × 500,000 × 1.5 × 0.5
    assert_eq!(report.amplification, 1.5);
    assert_eq!(report.records.len(), 3);
    for allocation in &report.records {
        assert_eq!(allocation.amount, 375_000);
        assert_eq!(allocation.tier_multiplier, 0.5);
    }
    let metals: Vec<_> = report.records.iter().map(|r| r.metal).collect();
    assert_eq!(metals, vec![Gold, Silver, Copper]);
}

#[test]
fn test_repeat_call_is_idempotent() {
    let ledger = ledger(1_000_000);
    let mut allocator = Allocator::new(Arc::clone(&ledger), AllocatorConfig::default());
    let record = record("sub-idem", 2500);

    let first = allocator.allocate(&record, "alice", &[Gold]).unwrap();
    assert_eq!(first.records.len(), 1);

    let second = allocator.allocate(&record, "alice", &[Gold]).unwrap();
    assert!(second.records.is_empty());
    assert_eq!(
        second.declined,
        vec![Declined {
            metal: Gold,
            reason: DeclineReason::AlreadyAllocated
        }]
    );
    assert_eq!(second.status, AllocationStatus::Allocated);

    assert_eq!(balance(&ledger, Epoch::Founder, Gold), 500_000);
    assert_eq!(
        ledger.allocations_for(&SubmissionId::from("sub-idem")).unwrap().len(),
        1
    );
}

#[test]
fn test_duplicate_categories_collapsed() {
    let ledger = ledger(1_000_000);
    let mut allocator = Allocator::new(Arc::clone(&ledger), AllocatorConfig::default());

    let report = allocator
        .allocate(&record("sub-dup", 2500), "alice", &[Gold, Gold, Gold])
        .unwrap();

    assert_eq!(report.amplification, 1.0);
    assert_eq!(report.records.len(), 1);
    assert!(report.declined.is_empty());
}

#[test]
fn test_empty_category_set_rejected() {
    let ledger = ledger(1_000_000);
    let mut allocator = Allocator::new(ledger, AllocatorConfig::default());
    let result = allocator.allocate(&record("sub-empty", 2500), "alice", &[]);
    assert!(matches!(result, Err(AllocationError::EmptyCategorySet)));
}

#[test]
fn test_unqualified_record_declined() {
    let ledger = ledger(1_000_000);
    let mut allocator = Allocator::new(Arc::clone(&ledger), AllocatorConfig::default());

    let report = allocator
        .allocate(&record("sub-low", 500), "alice", &[Gold, Copper])
        .unwrap();

    assert_eq!(report.epoch, None);
    assert_eq!(report.status, AllocationStatus::Unallocated);
    assert!(report.records.is_empty());
    assert!(report
        .declined
        .iter()
        .all(|d| d.reason == DeclineReason::NotQualified));
    assert_eq!(ledger.totals().unwrap().total_distributed, 0);
}

#[test]
fn test_closed_epoch_declined_then_retried() {
    let ledger = ledger(1_000_000);
    let mut allocator = Allocator::new(Arc::clone(&ledger), AllocatorConfig::default());
    let record = record("sub-pioneer", 1500);
    assert_eq!(record.qualification, Some(Epoch::Pioneer));

    let report = allocator.allocate(&record, "bob", &[Silver]).unwrap();
    assert_eq!(report.status, AllocationStatus::Unallocated);
    assert_eq!(report.declined[0].reason, DeclineReason::EpochClosed);

    assert_eq!(ledger.open_next_epoch().unwrap(), Some(Epoch::Pioneer));

    let report = allocator.allocate(&record, "bob", &[Silver]).unwrap();
    assert_eq!(report.status, AllocationStatus::Allocated);
    let allocation = &report.records[0];
    assert_eq!(allocation.epoch, Epoch::Pioneer);
    assert_eq!(allocation.tier_multiplier, 0.9);
    assert!(allocation.amount > 0);
    assert!(allocation.amount <= 500_000);
    assert_eq!(
        allocation.balance_after,
        allocation.balance_before - allocation.amount
    );
}

#[test]
fn test_zero_reward_does_not_consume_slot() {
    let ledger = ledger(1);
    let mut allocator = Allocator::new(Arc::clone(&ledger), AllocatorConfig::default());

    let report = allocator
        .allocate(&record("sub-zero", 2500), "alice", &[Gold])
        .unwrap();
    assert_eq!(report.declined[0].reason, DeclineReason::ZeroReward);
    assert!(!ledger
        .has_allocation(&SubmissionId::from("sub-zero"), Gold)
        .unwrap());
}

#[test]
fn test_configuration_version_mismatch() {
    let ledger = ledger(1_000_000);
    let mut allocator = Allocator::new(
        Arc::clone(&ledger),
        AllocatorConfig::for_version("assay-scoring-v2"),
    );

    let result = allocator.allocate(&record("sub-v", 2500), "alice", &[Gold]);
    match result {
        Err(AllocationError::ConfigurationVersionMismatch { expected, found }) => {
            assert_eq!(expected, "assay-scoring-v2");
            assert_eq!(found, "assay-scoring-v1");
        }
        other => panic!("Expected version mismatch, got {:?}", other),
    }
    assert_eq!(balance(&ledger, Epoch::Founder, Gold), 1_000_000);
}

#[test]
fn test_tampered_record_refused() {
    let ledger = ledger(1_000_000);
    let mut allocator = Allocator::new(Arc::clone(&ledger), AllocatorConfig::default());
    let mut record = record("sub-t", 1000);
    record.composite_total = 10_000;
    record.qualification = Some(Epoch::Founder);

    let result = allocator.allocate(&record, "mallory", &[Gold]);
    assert!(matches!(result, Err(AllocationError::IntegrityMismatch(id)) if id == "sub-t"));
    assert_eq!(balance(&ledger, Epoch::Founder, Gold), 1_000_000);
    assert_eq!(allocator.metrics().attempts, 0);
}

#[test]
fn test_notifier_sees_commits_only() {
    let ledger = ledger(1_000_000);
    let (notifier, mut receiver) = ChannelNotifier::new();
    let mut allocator =
        Allocator::new(Arc::clone(&ledger), AllocatorConfig::default()).with_notifier(notifier);
    let record = record("sub-n", 2500);

    allocator.allocate(&record, "alice", &[Gold]).unwrap();
    allocator.allocate(&record, "alice", &[Gold]).unwrap();

    let delivered = receiver.try_recv().unwrap();
    assert_eq!(delivered.submission_id, SubmissionId::from("sub-n"));
    assert_eq!(delivered.amount, 500_000);
    assert!(receiver.try_recv().is_err());
}

#[test]
fn test_metrics_track_outcomes() {
    let ledger = ledger(1_000_000);
    let mut allocator = Allocator::new(Arc::clone(&ledger), AllocatorConfig::default());
    let record = record("sub-m", 2500);

    allocator.allocate(&record, "alice", &[Gold]).unwrap();
    allocator.allocate(&record, "alice", &[Gold, Copper]).unwrap();

    let metrics = allocator.metrics();
    assert_eq!(metrics.attempts, 2);
    assert_eq!(metrics.commits, 2);
    assert_eq!(metrics.declines[&DeclineReason::AlreadyAllocated], 1);
    assert_eq!(metrics.distributed[&Gold], 500_000);
    assert!(metrics.summary().contains("Commits: 2"));
}

/// Ledger that reports a stale, larger Gold balance, as if another
/// allocation had landed between the read and the commit
struct StaleGoldLedger {
    inner: SqliteLedger,
}

impl EpochLedger for StaleGoldLedger {
    type Error = StoreError;

    fn initialize(&self, genesis: &Genesis) -> Result<bool, StoreError> {
        self.inner.initialize(genesis)
    }

    fn open_next_epoch(&self) -> Result<Option<Epoch>, StoreError> {
        self.inner.open_next_epoch()
    }

    fn balance(&self, epoch: Epoch, metal: MetalCategory) -> Result<MetalBalance, StoreError> {
        let mut pool = self.inner.balance(epoch, metal)?;
        if metal == Gold {
            pool.balance *= 10;
        }
        Ok(pool)
    }

    fn try_deduct(
        &self,
        epoch: Epoch,
        metal: MetalCategory,
        amount: u64,
    ) -> Result<DeductOutcome, StoreError> {
        self.inner.try_deduct(epoch, metal, amount)
    }

    fn has_allocation(
        &self,
        submission_id: &SubmissionId,
        metal: MetalCategory,
    ) -> Result<bool, StoreError> {
        self.inner.has_allocation(submission_id, metal)
    }

    fn commit_allocation(&self, draft: &AllocationDraft) -> Result<CommitOutcome, StoreError> {
        self.inner.commit_allocation(draft)
    }

    fn allocations_for(
        &self,
        submission_id: &SubmissionId,
    ) -> Result<Vec<AllocationRecord>, StoreError> {
        self.inner.allocations_for(submission_id)
    }

    fn totals(&self) -> Result<RunningTotals, StoreError> {
        self.inner.totals()
    }

    fn snapshot(&self) -> Result<LedgerSnapshot, StoreError> {
        self.inner.snapshot()
    }
}

#[test]
fn test_partial_success_keeps_commits() {
    let inner = SqliteLedger::in_memory().unwrap();
    inner.initialize(&Genesis::fixed(1_000_000)).unwrap();
    let ledger = Arc::new(StaleGoldLedger { inner });
    let mut allocator = Allocator::new(Arc::clone(&ledger), AllocatorConfig::default());

    let report = allocator
        .allocate(&record("sub-p", 2500), "alice", &[Gold, Silver])
        .unwrap();

    assert_eq!(report.status, AllocationStatus::Partial);
    assert_eq!(
        report.declined,
        vec![Declined {
            metal: Gold,
            reason: DeclineReason::InsufficientReserve
        }]
    );
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].metal, Silver);

    assert_eq!(balance(&ledger.inner, Epoch::Founder, Gold), 1_000_000);
    assert_eq!(balance(&ledger.inner, Epoch::Founder, Silver), 500_000);

    // Gold stays open for a retry
    assert!(!ledger
        .has_allocation(&SubmissionId::from("sub-p"), Gold)
        .unwrap());
}

/// Ledger that commits a rival draft just before the first commit it is
/// asked for, after the allocator has already read the balance
struct RivalCommitLedger {
    inner: SqliteLedger,
    rival: Mutex<Option<AllocationDraft>>,
}

impl EpochLedger for RivalCommitLedger {
    type Error = StoreError;

    fn initialize(&self, genesis: &Genesis) -> Result<bool, StoreError> {
        self.inner.initialize(genesis)
    }

    fn open_next_epoch(&self) -> Result<Option<Epoch>, StoreError> {
        self.inner.open_next_epoch()
    }

    fn balance(&self, epoch: Epoch, metal: MetalCategory) -> Result<MetalBalance, StoreError> {
        self.inner.balance(epoch, metal)
    }

    fn try_deduct(
        &self,
        epoch: Epoch,
        metal: MetalCategory,
        amount: u64,
    ) -> Result<DeductOutcome, StoreError> {
        self.inner.try_deduct(epoch, metal, amount)
    }

    fn has_allocation(
        &self,
        submission_id: &SubmissionId,
        metal: MetalCategory,
    ) -> Result<bool, StoreError> {
        self.inner.has_allocation(submission_id, metal)
    }

    fn commit_allocation(&self, draft: &AllocationDraft) -> Result<CommitOutcome, StoreError> {
        let rival = self.rival.lock().unwrap().take();
        if let Some(rival) = rival {
            let outcome = self.inner.commit_allocation(&rival)?;
            assert!(matches!(outcome, CommitOutcome::Committed(_)));
        }
        self.inner.commit_allocation(draft)
    }

    fn allocations_for(
        &self,
        submission_id: &SubmissionId,
    ) -> Result<Vec<AllocationRecord>, StoreError> {
        self.inner.allocations_for(submission_id)
    }

    fn totals(&self) -> Result<RunningTotals, StoreError> {
        self.inner.totals()
    }

    fn snapshot(&self) -> Result<LedgerSnapshot, StoreError> {
        self.inner.snapshot()
    }
}

#[test]
fn test_commit_between_read_and_commit_keeps_reserve() {
    let inner = SqliteLedger::in_memory().unwrap();
    inner.initialize(&Genesis::fixed(1_000_000)).unwrap();
    let rival = AllocationDraft {
        submission_id: SubmissionId::from("sub-rival"),
        contributor_id: "bob".to_string(),
        epoch: Epoch::Founder,
        metal: Gold,
        amount: 500_000,
        tier_multiplier: 1.0,
        amplification: 1.0,
    };
    let ledger = Arc::new(RivalCommitLedger {
        inner,
        rival: Mutex::new(Some(rival)),
    });
    let mut allocator = Allocator::new(Arc::clone(&ledger), AllocatorConfig::default());

    // Priced at 500,000 from the 1,000,000 read; the live pool is 500,000 by commit time
    let report = allocator.allocate(&record("sub-late", 2500), "alice", &[Gold]).unwrap();

    assert!(report.records.is_empty());
    assert_eq!(
        report.declined,
        vec![Declined {
            metal: Gold,
            reason: DeclineReason::InsufficientReserve
        }]
    );
    assert_eq!(report.status, AllocationStatus::Unallocated);
    assert_eq!(balance(&ledger.inner, Epoch::Founder, Gold), 500_000);
    assert_eq!(ledger.totals().unwrap().total_distributed, 500_000);

    // A retry prices from the live balance and leaves half of it in reserve
    let retry = allocator.allocate(&record("sub-late", 2500), "alice", &[Gold]).unwrap();
    assert_eq!(retry.status, AllocationStatus::Allocated);
    assert_eq!(retry.records[0].amount, 250_000);
    assert_eq!(balance(&ledger.inner, Epoch::Founder, Gold), 250_000);
}

#[test]
fn test_concurrent_allocators_conserve_supply() {
    let ledger = ledger(1_000_000);
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let ledger = Arc::clone(&ledger);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let record = record(&format!("sub-{}", i), 2500);
                let mut allocator = Allocator::new(ledger, AllocatorConfig::default());
                barrier.wait();
                allocator.allocate(&record, "alice", &[Copper]).unwrap()
            })
        })
        .collect();

    let reports: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for allocation in reports.iter().flat_map(|r| &r.records) {
        assert!(allocation.amount <= allocation.balance_before / 2);
        assert_eq!(allocation.balance_after, allocation.balance_before - allocation.amount);
    }
    let distributed: u64 = reports.iter().map(|r| r.total_amount()).sum();

    assert_eq!(
        balance(&ledger, Epoch::Founder, Copper) + distributed,
        1_000_000
    );
    assert_eq!(ledger.totals().unwrap().total_distributed, distributed);
}

#[test]
fn test_concurrent_retries_single_record() {
    let ledger = ledger(1_000_000);
    let barrier = Arc::new(Barrier::new(4));
    let record = record("sub-race", 2500);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let ledger = Arc::clone(&ledger);
            let barrier = Arc::clone(&barrier);
            let record = record.clone();
            thread::spawn(move || {
                let mut allocator = Allocator::new(ledger, AllocatorConfig::default());
                barrier.wait();
                allocator.allocate(&record, "alice", &[Gold]).unwrap()
            })
        })
        .collect();

    let committed: usize = handles
        .into_iter()
        .map(|h| h.join().unwrap().records.len())
        .sum();

    assert_eq!(committed, 1);
    let records = ledger.allocations_for(&SubmissionId::from("sub-race")).unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].amount <= records[0].balance_before / 2);
    assert_eq!(balance(&ledger, Epoch::Founder, Gold), 500_000);
}
