//! Genesis constants for seeding the epoch ledger

use crate::{Epoch, MetalBalance, MetalCategory};
use serde::{Deserialize, Serialize};

/// Total token supply seeded at genesis
pub const TOTAL_SUPPLY: u64 = 90_000_000_000_000;

/// Divisor giving the initial per-distribution increment from a pool balance
pub const INCREMENT_DIVISOR: u64 = 1000;

/// Fraction of total supply reserved for an epoch
pub fn epoch_share(epoch: Epoch) -> f64 {
    match epoch {
        Epoch::Founder => 0.5,
        Epoch::Pioneer => 0.25,
        Epoch::Community => 0.125,
        Epoch::Ecosystem => 0.125,
    }
}

/// Fraction of an epoch's reserve assigned to a metal
pub fn metal_share(metal: MetalCategory) -> f64 {
    match metal {
        MetalCategory::Gold => 0.5,
        MetalCategory::Silver => 0.25,
        MetalCategory::Copper => 0.25,
    }
}

/// Parameters used to seed every pool exactly once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genesis {
    /// Total supply split across epochs and metals
    pub total_supply: u64,

    /// Seed every pool with this balance instead of the share split
    #[serde(default)]
    pub fixed_pool_balance: Option<u64>,
}

impl Default for Genesis {
    fn default() -> Self {
        Self {
            total_supply: TOTAL_SUPPLY,
            fixed_pool_balance: None,
        }
    }
}

impl Genesis {
    /// Genesis that seeds every pool with the same balance
    pub fn fixed(balance: u64) -> Self {
        let pools = (Epoch::ALL.len() * MetalCategory::ALL.len()) as u64;
        Self {
            total_supply: balance.saturating_mul(pools),
            fixed_pool_balance: Some(balance),
        }
    }

    /// Initial state of one pool
    pub fn pool(&self, epoch: Epoch, metal: MetalCategory) -> MetalBalance {
        let (balance, percentage) = match self.fixed_pool_balance {
            Some(balance) => {
                let pools = (Epoch::ALL.len() * MetalCategory::ALL.len()) as f64;
                (balance, 100.0 / pools)
            }
            None => {
                let share = epoch_share(epoch) * metal_share(metal);
                ((self.total_supply as f64 * share).floor() as u64, share * 100.0)
            }
        };

        MetalBalance {
            epoch,
            metal,
            balance,
            halving_threshold: balance / 2,
            per_distribution_increment: balance / INCREMENT_DIVISOR,
            percentage_of_total_supply: percentage,
            halvings: 0,
        }
    }

    /// Initial state of every pool, ordered by epoch then metal
    pub fn pools(&self) -> Vec<MetalBalance> {
        Epoch::ALL
            .iter()
            .flat_map(|&epoch| MetalCategory::ALL.iter().map(move |&metal| (epoch, metal)))
            .map(|(epoch, metal)| self.pool(epoch, metal))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shares_sum_to_one() {
        let epochs: f64 = Epoch::ALL.iter().map(|e| epoch_share(*e)).sum();
        let metals: f64 = MetalCategory::ALL.iter().map(|m| metal_share(*m)).sum();
        assert_eq!(epochs, 1.0);
        assert_eq!(metals, 1.0);
    }

    #[test]
    fn test_default_genesis_conserves_supply() {
        let genesis = Genesis::default();
        let pools = genesis.pools();
        assert_eq!(pools.len(), 12);
        let seeded: u64 = pools.iter().map(|p| p.balance).sum();
        assert_eq!(seeded, TOTAL_SUPPLY);

        let founder_gold = genesis.pool(Epoch::Founder, MetalCategory::Gold);
        assert_eq!(founder_gold.balance, 22_500_000_000_000);
        assert_eq!(founder_gold.percentage_of_total_supply, 25.0);
        assert_eq!(founder_gold.halving_threshold, founder_gold.balance / 2);
    }

    #[test]
    fn test_fixed_genesis() {
        let genesis = Genesis::fixed(1_000_000);
        let pool = genesis.pool(Epoch::Founder, MetalCategory::Gold);
        assert_eq!(pool.balance, 1_000_000);
        assert_eq!(pool.halving_threshold, 500_000);
        assert_eq!(pool.per_distribution_increment, 1_000);
        assert_eq!(genesis.total_supply, 12_000_000);
    }
}
