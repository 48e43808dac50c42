//! Prediction Service - column alignment and probability extraction
//!
//! Binds a loaded classifier to the canonical feature layout. The model's
//! declared columns are normalized and checked for set equality against the
//! catalog at construction; any mismatch is a hard precondition failure,
//! never silently defaulted. Per request the service reorders the canonical
//! vector into model column order, invokes the classifier once, and reports
//! the positive-class probability. No retries.

use serde::{Deserialize, Serialize};

use crate::catalog::layout::{feature_index, FEATURE_COUNT, FEATURE_LAYOUT};
use crate::catalog::names::normalize_names;
use crate::catalog::vector::FeatureVector;

use super::classifier::{Classifier, InferenceError};

// ============================================================================
// PRECONDITION ERRORS
// ============================================================================

/// The model's declared feature set does not match the catalog
#[derive(Debug, Clone)]
pub struct PreconditionError {
    pub missing: Vec<String>,
    pub unexpected: Vec<String>,
}

impl std::fmt::Display for PreconditionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Feature set mismatch: missing {:?}, unexpected {:?}",
            self.missing, self.unexpected
        )
    }
}

impl std::error::Error for PreconditionError {}

// ============================================================================
// PREDICTION RESULT
// ============================================================================

/// Mortality probability for one request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Positive-class probability in [0, 1]
    pub probability: f64,
    pub inference_time_us: u64,
}

impl PredictionResult {
    /// Display scaling: 0-100
    pub fn as_percent(&self) -> f64 {
        self.probability * 100.0
    }
}

// ============================================================================
// PREDICTION SERVICE
// ============================================================================

/// Wraps a classifier with column alignment against the canonical layout
pub struct PredictionService {
    classifier: Box<dyn Classifier>,
    /// Model column j holds the value of canonical index column_map[j]
    column_map: Vec<usize>,
}

impl PredictionService {
    pub fn new(classifier: Box<dyn Classifier>) -> Result<Self, PreconditionError> {
        let normalized = normalize_names(classifier.raw_feature_names());
        let column_map = resolve_columns(&normalized)?;

        log::info!(
            "Prediction service ready: {} columns aligned for {}",
            column_map.len(),
            classifier.model_name()
        );

        Ok(Self {
            classifier,
            column_map,
        })
    }

    /// Canonical-index permutation in model column order
    pub fn column_map(&self) -> &[usize] {
        &self.column_map
    }

    /// Reorder a canonical vector into model column order
    pub fn to_model_order(&self, vector: &FeatureVector) -> Vec<f64> {
        let values = vector.as_array();
        self.column_map.iter().map(|&i| values[i]).collect()
    }

    pub fn predict(&self, vector: &FeatureVector) -> Result<PredictionResult, InferenceError> {
        vector
            .validate()
            .map_err(|e| InferenceError(e.to_string()))?;

        let start_time = std::time::Instant::now();
        let model_input = self.to_model_order(vector);
        let probabilities = self.classifier.predict_proba(&model_input)?;

        // Positive class is last; single-value outputs are already positive
        let probability = *probabilities
            .last()
            .ok_or_else(|| InferenceError("Classifier returned no probabilities".to_string()))?;

        if !(0.0..=1.0).contains(&probability) || !probability.is_finite() {
            return Err(InferenceError(format!(
                "Probability {} outside [0, 1]",
                probability
            )));
        }

        Ok(PredictionResult {
            probability,
            inference_time_us: start_time.elapsed().as_micros() as u64,
        })
    }
}

/// Verify set equality between normalized model columns and the catalog,
/// and build the model-order -> canonical-index permutation
fn resolve_columns(normalized: &[String]) -> Result<Vec<usize>, PreconditionError> {
    let unexpected: Vec<String> = normalized
        .iter()
        .filter(|n| feature_index(n).is_none())
        .cloned()
        .collect();

    let missing: Vec<String> = FEATURE_LAYOUT
        .iter()
        .filter(|name| !normalized.iter().any(|n| n == *name))
        .map(|s| s.to_string())
        .collect();

    if !missing.is_empty() || !unexpected.is_empty() || normalized.len() != FEATURE_COUNT {
        return Err(PreconditionError {
            missing,
            unexpected,
        });
    }

    // Set equality holds and lengths match, so every lookup succeeds
    Ok(normalized
        .iter()
        .filter_map(|n| feature_index(n))
        .collect())
}

// ============================================================================
// TESTS
// ============================================================================
