//! Allocation orchestrator: a sealed score record in, allocation records out

use assay_domain::traits::{AllocationNotifier, EpochLedger};
use assay_domain::{
    AllocationDraft, AllocationRecord, CommitOutcome, Epoch, MetalCategory, ScoreRecord,
};
use assay_scorer::verify_record;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::reward::{amplification, reward_amount};
use crate::{
    AllocationError, AllocationMetrics, AllocationReport, AllocatorConfig, DeclineReason, Declined,
};

/// Allocation orchestrator
///
/// Drives the ledger's atomic commit once per requested category. Several
/// allocators may share one ledger through the `Arc`; the ledger alone
/// arbitrates concurrent deductions.
///
/// # Examples
///
/// ```
/// use assay_allocator::{Allocator, AllocatorConfig, AllocationStatus};
/// use assay_domain::traits::EpochLedger;
/// use assay_domain::{EvaluatorOutput, Genesis, MetalCategory};
/// use assay_scorer::ScoringPipeline;
/// use assay_store::SqliteLedger;
/// use std::sync::Arc;
///
/// let ledger = Arc::new(SqliteLedger::in_memory().unwrap());
/// ledger.initialize(&Genesis::fixed(1_000_000)).unwrap();
///
/// let output: EvaluatorOutput = serde_json::from_str(
///     r#"{"novelty": 2500, "density": 2500, "coherence": 2500, "alignment": 2500}"#,
/// ).unwrap();
/// let record = ScoringPipeline::default_pipeline().score("sub-1", &output).unwrap();
///
/// let mut allocator = Allocator::new(ledger, AllocatorConfig::default());
/// let report = allocator.allocate(&record, "alice", &[MetalCategory::Gold]).unwrap();
/// assert_eq!(report.status, AllocationStatus::Allocated);
/// assert_eq!(report.records[0].amount, 500_000);
/// ```
pub struct Allocator<L: EpochLedger> {
    ledger: Arc<L>,
    config: AllocatorConfig,
    metrics: AllocationMetrics,
    notifiers: Vec<Box<dyn AllocationNotifier + Send + Sync>>,
}

impl<L> Allocator<L>
where
    L: EpochLedger,
    L::Error: Display,
{
    /// Create an allocator over a shared ledger
    pub fn new(ledger: Arc<L>, config: AllocatorConfig) -> Self {
        Self {
            ledger,
            config,
            metrics: AllocationMetrics::new(),
            notifiers: Vec::new(),
        }
    }

    /// Create an allocator after validating the configuration
    pub fn try_new(ledger: Arc<L>, config: AllocatorConfig) -> Result<Self, AllocationError> {
        config.validate().map_err(AllocationError::Config)?;
        Ok(Self::new(ledger, config))
    }

    /// Add a notifier called after every committed allocation
    pub fn with_notifier(mut self, notifier: impl AllocationNotifier + Send + Sync + 'static) -> Self {
        self.add_notifier(notifier);
        self
    }

    /// Add a notifier called after every committed allocation
    pub fn add_notifier(&mut self, notifier: impl AllocationNotifier + Send + Sync + 'static) {
        self.notifiers.push(Box::new(notifier));
    }

    /// The shared ledger
    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    /// The active configuration
    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &AllocationMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Allocate rewards for a sealed score record
    ///
    /// Categories are attempted sequentially in first-occurrence order. A
    /// category that cannot be allocated is declined with a reason; earlier
    /// commits in the same call stay committed. Only a mismatched
    /// configuration version, a tampered record, an empty category set, or a
    /// ledger failure is an error.
    pub fn allocate(
        &mut self,
        record: &ScoreRecord,
        contributor_id: &str,
        metals: &[MetalCategory],
    ) -> Result<AllocationReport, AllocationError> {
        let categories = dedupe(metals);
        if categories.is_empty() {
            return Err(AllocationError::EmptyCategorySet);
        }
        self.check_record(record)?;
        self.metrics.record_attempt();

        let amplification = amplification(&categories);
        let mut records = Vec::new();
        let mut declined = Vec::new();

        match record.qualification {
            None => {
                debug!(
                    submission_id = %record.submission_id,
                    composite_total = record.composite_total,
                    "Record below qualification thresholds"
                );
                for metal in &categories {
                    self.decline(&mut declined, record, *metal, DeclineReason::NotQualified);
                }
            }
            Some(epoch) => {
                let tier_multiplier = self.config.tier_multipliers.for_epoch(epoch);
                for metal in &categories {
                    let outcome = self.allocate_one(
                        record,
                        contributor_id,
                        epoch,
                        *metal,
                        amplification,
                        tier_multiplier,
                    )?;
                    match outcome {
                        Ok(allocation) => records.push(allocation),
                        Err(reason) => self.decline(&mut declined, record, *metal, reason),
                    }
                }
            }
        }

        let status = AllocationReport::status_for(&records, &declined);
        info!(
            submission_id = %record.submission_id,
            committed = records.len(),
            declined = declined.len(),
            status = ?status,
            "Allocation finished"
        );

        Ok(AllocationReport {
            submission_id: record.submission_id.clone(),
            epoch: record.qualification,
            amplification,
            records,
            declined,
            status,
        })
    }

    fn check_record(&self, record: &ScoreRecord) -> Result<(), AllocationError> {
        if record.config_version != self.config.expected_config_version {
            return Err(AllocationError::ConfigurationVersionMismatch {
                expected: self.config.expected_config_version.clone(),
                found: record.config_version.clone(),
            });
        }
        if self.config.verify_integrity
            && !verify_record(record).map_err(|e| AllocationError::Scorer(e.to_string()))?
        {
            warn!(submission_id = %record.submission_id, "Integrity hash mismatch");
            return Err(AllocationError::IntegrityMismatch(
                record.submission_id.to_string(),
            ));
        }
        Ok(())
    }

    /// One category: uniqueness, reward from the current balance, atomic commit
    fn allocate_one(
        &mut self,
        record: &ScoreRecord,
        contributor_id: &str,
        epoch: Epoch,
        metal: MetalCategory,
        amplification: f64,
        tier_multiplier: f64,
    ) -> Result<Result<AllocationRecord, DeclineReason>, AllocationError> {
        let ledger_err = |e: L::Error| AllocationError::Ledger(e.to_string());

        if self
            .ledger
            .has_allocation(&record.submission_id, metal)
            .map_err(ledger_err)?
        {
            return Ok(Err(DeclineReason::AlreadyAllocated));
        }
        if !self.ledger.open_epochs().map_err(ledger_err)?.contains(&epoch) {
            return Ok(Err(DeclineReason::EpochClosed));
        }

        let pool = self.ledger.balance(epoch, metal).map_err(ledger_err)?;
        let amount = reward_amount(
            record.composite_total,
            pool.allocatable(),
            amplification,
            tier_multiplier,
        );
        if amount == 0 {
            return Ok(Err(DeclineReason::ZeroReward));
        }

        let draft = AllocationDraft {
            submission_id: record.submission_id.clone(),
            contributor_id: contributor_id.to_string(),
            epoch,
            metal,
            amount,
            tier_multiplier,
            amplification,
        };

        match self.ledger.commit_allocation(&draft).map_err(ledger_err)? {
            CommitOutcome::Committed(allocation) => {
                self.metrics.record_commit(metal, allocation.amount);
                for notifier in &self.notifiers {
                    notifier.notify(&allocation);
                }
                Ok(Ok(allocation))
            }
            CommitOutcome::InsufficientReserve { .. } => Ok(Err(DeclineReason::InsufficientReserve)),
            CommitOutcome::AlreadyAllocated => Ok(Err(DeclineReason::AlreadyAllocated)),
            CommitOutcome::EpochClosed => Ok(Err(DeclineReason::EpochClosed)),
        }
    }

    fn decline(
        &mut self,
        declined: &mut Vec<Declined>,
        record: &ScoreRecord,
        metal: MetalCategory,
        reason: DeclineReason,
    ) {
        info!(
            submission_id = %record.submission_id,
            metal = %metal,
            reason = %reason,
            "Declined category"
        );
        self.metrics.record_decline(reason);
        declined.push(Declined { metal, reason });
    }
}

/// Collapse repeated categories, keeping first-occurrence order
fn dedupe(metals: &[MetalCategory]) -> Vec<MetalCategory> {
    let mut categories = Vec::with_capacity(metals.len());
    for metal in metals {
        if !categories.contains(metal) {
            categories.push(*metal);
        }
    }
    categories
}
