//! Metal categories and per-epoch reserve balances

use crate::Epoch;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three reserve pools a qualifying submission may draw from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetalCategory {
    /// Scarcest pool; discovery-heavy contributions
    Gold,
    /// Development-leaning contributions
    Silver,
    /// Integration-heavy contributions
    Copper,
}

impl MetalCategory {
    /// All metal categories
    pub const ALL: [MetalCategory; 3] = [
        MetalCategory::Gold,
        MetalCategory::Silver,
        MetalCategory::Copper,
    ];

    /// Get the metal name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            MetalCategory::Gold => "gold",
            MetalCategory::Silver => "silver",
            MetalCategory::Copper => "copper",
        }
    }

    /// Parse a metal from a string (internal use)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "gold" => Some(MetalCategory::Gold),
            "silver" => Some(MetalCategory::Silver),
            "copper" => Some(MetalCategory::Copper),
            _ => None,
        }
    }
}

impl fmt::Display for MetalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MetalCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid metal category: {}", s))
    }
}

/// Heuristic metal recommendation attached to a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetalRecommendation {
    /// Novelty and density dominate
    Gold,
    /// Development-leaning contribution
    Silver,
    /// Coherence and alignment dominate
    Copper,
    /// Balanced across all dimensions
    Hybrid,
}

impl MetalRecommendation {
    /// Metal categories this recommendation expands to
    pub fn metals(&self) -> Vec<MetalCategory> {
        match self {
            MetalRecommendation::Gold => vec![MetalCategory::Gold],
            MetalRecommendation::Silver => vec![MetalCategory::Silver],
            MetalRecommendation::Copper => vec![MetalCategory::Copper],
            MetalRecommendation::Hybrid => MetalCategory::ALL.to_vec(),
        }
    }

    /// Recommendation that best describes an explicit set of metals
    pub fn from_metals(metals: &[MetalCategory]) -> Self {
        match metals {
            [MetalCategory::Gold] => MetalRecommendation::Gold,
            [MetalCategory::Silver] => MetalRecommendation::Silver,
            [MetalCategory::Copper] => MetalRecommendation::Copper,
            _ => MetalRecommendation::Hybrid,
        }
    }
}

/// Reserve balance for one metal within one epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetalBalance {
    /// Owning epoch
    pub epoch: Epoch,
    /// Metal category
    pub metal: MetalCategory,
    /// Current balance
    pub balance: u64,
    /// Balance level at which the next halving is recorded
    pub halving_threshold: u64,
    /// Nominal per-distribution emission unit; halves with each halving
    pub per_distribution_increment: u64,
    /// Share of the total supply seeded into this pool at genesis
    pub percentage_of_total_supply: f64,
    /// Number of halvings recorded so far
    pub halvings: u32,
}

impl MetalBalance {
    /// Portion of the balance allocatable in a single pass
    ///
    /// The other half stays in reserve for later submissions in the same epoch.
    pub fn allocatable(&self) -> u64 {
        self.balance / 2
    }

    /// Reduce the balance by `amount` and settle any halvings this triggers
    ///
    /// Returns `None` (leaving the balance untouched) if `amount` exceeds the balance.
    pub fn deducted(&self, amount: u64) -> Option<Self> {
        let balance = self.balance.checked_sub(amount)?;
        let mut next = self.clone();
        next.balance = balance;
        next.settle_halvings();
        Some(next)
    }

    /// Halve threshold and increment while the balance sits at or below the threshold
    ///
    /// Returns the number of halvings recorded.
    pub fn settle_halvings(&mut self) -> u32 {
        let mut recorded = 0;
        while self.halving_threshold > 0 && self.balance <= self.halving_threshold {
            self.halving_threshold /= 2;
            self.per_distribution_increment /= 2;
            self.halvings += 1;
            recorded += 1;
        }
        recorded
    }
}
