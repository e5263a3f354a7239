//! Precision coupling of coherence with the validity verdict

use assay_domain::precision::PRECISION_INDEX_MAX;
use assay_domain::{PrecisionResult, PrecisionTier, ValidityVerdict, DIMENSION_MAX};

/// Absorbs binary rounding error below the tenths digit
const TENTHS_TOLERANCE: f64 = 1e-9;

/// Couple the coherence dimension with a validity verdict
///
/// n̂ = floor(16 × c × (1 − penalty)) where c = coherence / 2500 and the
/// penalty is the verdict's degeneracy penalty. The bubble class keeps the
/// first decimal of the un-floored index.
///
/// # Examples
///
/// ```
/// use assay_domain::{PrecisionTier, ValidityVerdict};
/// use assay_scorer::couple;
///
/// // No bundle: maximal penalty, so coherence cannot help
/// let result = couple(2500.0, &ValidityVerdict::missing());
/// assert_eq!(result.index, 0);
/// assert_eq!(result.tier, PrecisionTier::Community);
/// ```
pub fn couple(coherence: f64, verdict: &ValidityVerdict) -> PrecisionResult {
    let ratio = if coherence.is_finite() {
        (coherence / DIMENSION_MAX).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let penalty = if verdict.degeneracy_penalty.is_finite() {
        verdict.degeneracy_penalty.clamp(0.0, 1.0)
    } else {
        1.0
    };

    let max = f64::from(PRECISION_INDEX_MAX);
    let raw_index = (max * ratio * (1.0 - penalty)).clamp(0.0, max);
    // Work in tenths so 16 × 0.7 lands on 11.2, not 11.1
    let tenths = (raw_index * 10.0 + TENTHS_TOLERANCE).floor().clamp(0.0, max * 10.0) as u32;
    let index = (tenths / 10) as u8;

    PrecisionResult {
        index,
        raw_index,
        bubble_class: format!("B{}.{}", index, tenths % 10),
        tier: PrecisionTier::from_index(index),
        inconsistency_penalty: penalty,
    }
}
