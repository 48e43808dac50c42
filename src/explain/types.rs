//! Explanation data structures
//!
//! `RawAttribution` captures the two return shapes attribution engines are
//! known to produce for a two-class model. It is resolved into a single
//! normalized `Explanation` at the service boundary; nothing downstream
//! ever branches on shape.

use serde::{Deserialize, Serialize};

/// Raw engine output, before positive-class selection
#[derive(Debug, Clone, PartialEq)]
pub enum RawAttribution {
    /// One attribution array per class, with per-class expected values
    PerClass {
        values: Vec<Vec<f64>>,
        expected: Vec<f64>,
    },
    /// Already isolated to the positive class
    SinglePositive { values: Vec<f64>, expected: f64 },
}

/// Normalized per-feature explanation for one request
///
/// All sequences are aligned 1:1 with the canonical feature order.
/// Positive contributions push predicted risk up, negative push it down.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanation {
    /// Expected model output with no feature-specific evidence
    pub baseline_value: f64,
    pub contributions: Vec<f64>,
    pub feature_labels: Vec<String>,
    pub feature_values: Vec<f64>,
}

impl Explanation {
    /// Raw model score implied by the attribution identity:
    /// baseline + sum of contributions
    pub fn raw_score(&self) -> f64 {
        self.baseline_value + self.contributions.iter().sum::<f64>()
    }
}
