//! Epoch module - ordered qualification tiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualification tier ("epoch")
///
/// Epochs open strictly in order: Founder → Pioneer → Community → Ecosystem.
/// The set of open epochs is always a prefix of that ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Epoch {
    /// Composite total of 8000 or more
    Founder,

    /// Composite total of 6000 or more
    Pioneer,

    /// Composite total of 5000 or more
    Community,

    /// Composite total of 4000 or more
    Ecosystem,
}

impl Epoch {
    /// All epochs in opening order
    pub const ALL: [Epoch; 4] = [
        Epoch::Founder,
        Epoch::Pioneer,
        Epoch::Community,
        Epoch::Ecosystem,
    ];

    /// Get the epoch name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Epoch::Founder => "founder",
            Epoch::Pioneer => "pioneer",
            Epoch::Community => "community",
            Epoch::Ecosystem => "ecosystem",
        }
    }

    /// Parse an epoch from a string (internal use)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "founder" => Some(Epoch::Founder),
            "pioneer" => Some(Epoch::Pioneer),
            "community" => Some(Epoch::Community),
            "ecosystem" => Some(Epoch::Ecosystem),
            _ => None,
        }
    }

    /// Zero-based position in the opening order
    pub fn ordinal(&self) -> u8 {
        match self {
            Epoch::Founder => 0,
            Epoch::Pioneer => 1,
            Epoch::Community => 2,
            Epoch::Ecosystem => 3,
        }
    }

    /// Epoch at a zero-based position
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }

    /// Get the next epoch in the opening order
    pub fn next(&self) -> Option<Self> {
        Self::from_ordinal(self.ordinal() + 1)
    }

    /// Minimum composite total that qualifies for this epoch
    pub fn qualification_threshold(&self) -> u32 {
        match self {
            Epoch::Founder => 8000,
            Epoch::Pioneer => 6000,
            Epoch::Community => 5000,
            Epoch::Ecosystem => 4000,
        }
    }

    /// Classify a composite total, highest threshold first
    ///
    /// Returns `None` for a recognized but unqualified total.
    pub fn qualify(total: u32) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|epoch| total >= epoch.qualification_threshold())
    }

    /// Whether this epoch is open given the number of open epochs
    pub fn is_open_within(&self, open_epochs: u8) -> bool {
        self.ordinal() < open_epochs
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Epoch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid epoch: {}", s))
    }
}
