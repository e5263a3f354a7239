//! Quality dimensions and the raw shapes the evaluator may return for them

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Upper bound for every individual dimension
pub const DIMENSION_MAX: f64 = 2500.0;

/// A scalar that appears inside a nested dimension record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged, from = "serde_json::Value")]
pub enum RawScalar {
    /// Plain JSON number
    Number(f64),
    /// Numeric text such as `"1800"` (or any other string)
    Text(String),
    /// Anything else (arrays, booleans, objects)
    Other(serde_json::Value),
}

/// Nested dimension record exposing final/score/base fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NestedDimension {
    /// Final (post-adjustment) value, preferred when present
    #[serde(rename = "final", skip_serializing_if = "Option::is_none")]
    pub final_value: Option<RawScalar>,

    /// Score value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<RawScalar>,

    /// Base (pre-adjustment) value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<RawScalar>,
}

/// One dimension exactly as the evaluator returned it
///
/// The evaluator is not consistent about shapes, so the boundary accepts
/// every shape it has been seen to produce and the normalizer resolves it
/// to a single number. Deserialization classifies the JSON value by kind;
/// it never fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged, from = "serde_json::Value")]
pub enum RawDimension {
    /// Plain JSON number
    Number(f64),
    /// A string, possibly numeric
    Text(String),
    /// A record with final/score/base fields
    Nested(NestedDimension),
    /// Field absent or `null`
    #[default]
    Missing,
    /// Any other JSON value
    Unrecognized(serde_json::Value),
}

impl From<Value> for RawScalar {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) => match n.as_f64() {
                Some(v) => RawScalar::Number(v),
                None => RawScalar::Other(Value::Number(n)),
            },
            Value::String(s) => RawScalar::Text(s),
            other => RawScalar::Other(other),
        }
    }
}

impl NestedDimension {
    fn from_map(map: serde_json::Map<String, Value>) -> Self {
        let mut nested = Self::default();
        for (key, value) in map {
            if value.is_null() {
                continue;
            }
            match key.as_str() {
                "final" => nested.final_value = Some(RawScalar::from(value)),
                "score" => nested.score = Some(RawScalar::from(value)),
                "base" => nested.base = Some(RawScalar::from(value)),
                _ => {}
            }
        }
        nested
    }
}

impl From<Value> for RawDimension {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => RawDimension::Missing,
            Value::Number(n) => match n.as_f64() {
                Some(v) => RawDimension::Number(v),
                None => RawDimension::Unrecognized(Value::Number(n)),
            },
            Value::String(s) => RawDimension::Text(s),
            Value::Object(map) => RawDimension::Nested(NestedDimension::from_map(map)),
            other => RawDimension::Unrecognized(other),
        }
    }
}

/// The four normalized quality dimensions of a submission
///
/// Each value is in `[0, DIMENSION_MAX]`. Produced once by the normalizer
/// and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionSet {
    /// How new the contribution is relative to prior work
    pub novelty: f64,
    /// Information density
    pub density: f64,
    /// Internal coherence; also drives the precision index
    pub coherence: f64,
    /// Alignment with the program's goals
    pub alignment: f64,
}

impl DimensionSet {
    /// Create a dimension set, clamping each value into `[0, DIMENSION_MAX]`
    ///
    /// Non-finite values become 0.
    pub fn new(novelty: f64, density: f64, coherence: f64, alignment: f64) -> Self {
        Self {
            novelty: clamp_dimension(novelty),
            density: clamp_dimension(density),
            coherence: clamp_dimension(coherence),
            alignment: clamp_dimension(alignment),
        }
    }

    /// All-zero dimension set
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Sum of the four dimensions (0 to 10000)
    pub fn sum(&self) -> f64 {
        self.novelty + self.density + self.coherence + self.alignment
    }

    /// Novelty plus density ("discovery" weight)
    pub fn discovery_weight(&self) -> f64 {
        self.novelty + self.density
    }

    /// Coherence plus alignment ("integration" weight)
    pub fn integration_weight(&self) -> f64 {
        self.coherence + self.alignment
    }
}

fn clamp_dimension(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, DIMENSION_MAX)
    } else {
        0.0
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: every constructed dimension lies in [0, DIMENSION_MAX]
        #[test]
        fn test_dimensions_always_bounded(
            a in proptest::num::f64::ANY,
            b in proptest::num::f64::ANY,
            c in proptest::num::f64::ANY,
            d in proptest::num::f64::ANY,
        ) {
            let dims = DimensionSet::new(a, b, c, d);
            for v in [dims.novelty, dims.density, dims.coherence, dims.alignment] {
                prop_assert!((0.0..=DIMENSION_MAX).contains(&v));
            }
            prop_assert!((0.0..=4.0 * DIMENSION_MAX).contains(&dims.sum()));
        }
    }
}
