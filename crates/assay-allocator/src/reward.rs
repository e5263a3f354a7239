//! Reward arithmetic

use assay_domain::MetalCategory;

/// Composite total that earns the full allocatable amount
pub const FULL_SCORE: f64 = 10_000.0;

/// Category-combination amplification for a submission's full category set
///
/// The same value applies to every category of one submission.
pub fn amplification(categories: &[MetalCategory]) -> f64 {
    let has = |metal| categories.contains(&metal);
    match (
        has(MetalCategory::Gold),
        has(MetalCategory::Silver),
        has(MetalCategory::Copper),
    ) {
        (true, true, true) => 1.5,
        (true, true, false) => 1.25,
        (true, false, true) => 1.2,
        (false, true, true) => 1.15,
        _ => 1.0,
    }
}

/// `floor((total / 10000) × allocatable × amplification × tier_multiplier)`,
/// clamped to `[0, allocatable]`
pub fn reward_amount(
    composite_total: u32,
    allocatable: u64,
    amplification: f64,
    tier_multiplier: f64,
) -> u64 {
    let base = (f64::from(composite_total) / FULL_SCORE) * allocatable as f64;
    let amplified = (base * amplification * tier_multiplier).floor();
    if !amplified.is_finite() || amplified <= 0.0 {
        return 0;
    }
    // Saturating cast, then the pool-half cap
    (amplified as u64).min(allocatable)
}
