//! Metrics collection for allocation calls

use assay_domain::MetalCategory;
use std::collections::HashMap;

use crate::DeclineReason;

/// Counters collected across allocation calls
#[derive(Debug, Clone, Default)]
pub struct AllocationMetrics {
    /// Allocation calls that passed validation
    pub attempts: usize,

    /// Records committed
    pub commits: usize,

    /// Declined categories per reason
    pub declines: HashMap<DeclineReason, usize>,

    /// Amount distributed per metal
    pub distributed: HashMap<MetalCategory, u64>,
}

impl AllocationMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an allocation call
    pub fn record_attempt(&mut self) {
        self.attempts += 1;
    }

    /// Record a committed allocation
    pub fn record_commit(&mut self, metal: MetalCategory, amount: u64) {
        self.commits += 1;
        *self.distributed.entry(metal).or_insert(0) += amount;
    }

    /// Record a declined category
    pub fn record_decline(&mut self, reason: DeclineReason) {
        *self.declines.entry(reason).or_insert(0) += 1;
    }

    /// Total declined categories across all reasons
    pub fn total_declined(&self) -> usize {
        self.declines.values().sum()
    }

    /// Total amount distributed across all metals
    pub fn total_distributed(&self) -> u64 {
        self.distributed.values().sum()
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        self.attempts = 0;
        self.commits = 0;
        self.declines.clear();
        self.distributed.clear();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Allocation Metrics Summary".to_string(),
            "==========================".to_string(),
            format!("Attempts: {}", self.attempts),
            format!("Commits: {}", self.commits),
            String::new(),
        ];

        if !self.distributed.is_empty() {
            lines.push("Distributed by metal:".to_string());
            let mut metals: Vec<_> = self.distributed.iter().collect();
            metals.sort();
            for (metal, amount) in metals {
                lines.push(format!("  {}: {}", metal, amount));
            }
            lines.push(format!("  Total: {}", self.total_distributed()));
            lines.push(String::new());
        }

        if !self.declines.is_empty() {
            lines.push("Declines by reason:".to_string());
            let mut reasons: Vec<_> = self.declines.iter().collect();
            reasons.sort();
            for (reason, count) in reasons {
                lines.push(format!("  {}: {}", reason, count));
            }
            lines.push(format!("  Total: {}", self.total_declined()));
        }

        lines.join("\n")
    }
}
