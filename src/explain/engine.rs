//! Attribution engine - contribution graph backend
//!
//! The attribution computation itself is opaque: a companion artifact
//! exported next to the classifier emits, for one input row, a value per
//! feature plus a trailing expected (baseline) value. Binary exports may
//! carry that row once per class. Both shapes are decoded here into
//! `RawAttribution`; selecting the positive class is the service's job.

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;
use std::path::Path;

use crate::model::metadata::ArtifactError;

use super::types::RawAttribution;

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug)]
pub enum AttributionError {
    /// The engine's call signature differs from expected; the service
    /// retries the alternate call form exactly once on this variant
    InterfaceMismatch(String),
    /// Output shape fits neither known layout
    Shape(String),
    /// Any other engine failure
    Engine(String),
}

impl std::fmt::Display for AttributionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributionError::InterfaceMismatch(msg) => {
                write!(f, "Attribution interface mismatch: {}", msg)
            }
            AttributionError::Shape(msg) => write!(f, "Attribution shape error: {}", msg),
            AttributionError::Engine(msg) => write!(f, "Attribution engine error: {}", msg),
        }
    }
}

impl std::error::Error for AttributionError {}

// ============================================================================
// ENGINE CONTRACT
// ============================================================================

/// Contract of an attribution engine
///
/// `attributions` is the primary call form. `attributions_compat` is the
/// alternate form kept to bridge known API drift across artifact versions;
/// engines without drift inherit the default delegation.
pub trait AttributionEngine {
    fn attributions(&self, features: &[f64]) -> Result<RawAttribution, AttributionError>;

    fn attributions_compat(&self, features: &[f64]) -> Result<RawAttribution, AttributionError> {
        self.attributions(features)
    }
}

// ============================================================================
// ONNX IMPLEMENTATION
// ============================================================================

/// Contribution-graph backend
///
/// Mutex for the same reason as the classifier session: the runtime's
/// `run` requires exclusive access; the session itself is never replaced.
pub struct OnnxAttribution {
    session: Mutex<Session>,
    feature_count: usize,
}

impl OnnxAttribution {
    pub fn load(path: impl AsRef<Path>, feature_count: usize) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        log::info!("Loading attribution artifact from: {}", path.display());

        if !path.exists() {
            return Err(ArtifactError(format!(
                "Attribution artifact not found: {}",
                path.display()
            )));
        }

        let session = Session::builder()
            .map_err(|e| ArtifactError(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ArtifactError(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(path)
            .map_err(|e| ArtifactError(format!("Failed to load artifact: {}", e)))?;

        log::info!("Attribution artifact loaded successfully");

        Ok(Self {
            session: Mutex::new(session),
            feature_count,
        })
    }

    fn input_array(&self, features: &[f64]) -> Result<Array2<f32>, AttributionError> {
        if features.len() != self.feature_count {
            return Err(AttributionError::Engine(format!(
                "Expected {} features, got {}",
                self.feature_count,
                features.len()
            )));
        }

        let data: Vec<f32> = features.iter().map(|&v| v as f32).collect();
        Array2::<f32>::from_shape_vec((1, self.feature_count), data)
            .map_err(|e| AttributionError::Engine(format!("Array error: {}", e)))
    }
}

/// Decode a contribution-graph output buffer
///
/// pred_contrib layout: one value per feature plus a trailing expected
/// value, emitted once (positive class only) or once per class.
pub fn decode_contrib_output(
    feature_count: usize,
    data: &[f32],
) -> Result<RawAttribution, AttributionError> {
    let row = feature_count + 1;

    if data.len() == row {
        let values: Vec<f64> = data[..feature_count].iter().map(|&v| v as f64).collect();
        Ok(RawAttribution::SinglePositive {
            values,
            expected: data[feature_count] as f64,
        })
    } else if data.len() == 2 * row {
        let mut values = Vec::with_capacity(2);
        let mut expected = Vec::with_capacity(2);
        for class in data.chunks_exact(row) {
            values.push(class[..feature_count].iter().map(|&v| v as f64).collect());
            expected.push(class[feature_count] as f64);
        }
        Ok(RawAttribution::PerClass { values, expected })
    } else {
        Err(AttributionError::Shape(format!(
            "Output length {} fits neither {} nor {}",
            data.len(),
            row,
            2 * row
        )))
    }
}

impl AttributionEngine for OnnxAttribution {
    /// Primary call form: positional input binding
    fn attributions(&self, features: &[f64]) -> Result<RawAttribution, AttributionError> {
        let tensor = Value::from_array(self.input_array(features)?)
            .map_err(|e| AttributionError::Engine(format!("Tensor error: {}", e)))?;
        let mut session = self.session.lock();

        let output_name = last_output_name(&session)?;
        let outputs = session
            .run(ort::inputs![tensor])
            .map_err(|e| AttributionError::InterfaceMismatch(e.to_string()))?;

        let output = outputs
            .get(&output_name)
            .ok_or_else(|| AttributionError::Engine("No output".to_string()))?;
        let extracted = output
            .try_extract_tensor::<f32>()
            .map_err(|e| AttributionError::Engine(format!("Extract error: {}", e)))?;

        decode_contrib_output(self.feature_count, extracted.1)
    }

    /// Alternate call form: bind by the graph's declared input name
    fn attributions_compat(&self, features: &[f64]) -> Result<RawAttribution, AttributionError> {
        let tensor = Value::from_array(self.input_array(features)?)
            .map_err(|e| AttributionError::Engine(format!("Tensor error: {}", e)))?;
        let mut session = self.session.lock();

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .ok_or_else(|| AttributionError::Engine("No input defined".to_string()))?;

        let output_name = last_output_name(&session)?;
        let outputs = session
            .run(ort::inputs![input_name.as_str() => tensor])
            .map_err(|e| AttributionError::Engine(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(&output_name)
            .ok_or_else(|| AttributionError::Engine("No output".to_string()))?;
        let extracted = output
            .try_extract_tensor::<f32>()
            .map_err(|e| AttributionError::Engine(format!("Extract error: {}", e)))?;

        decode_contrib_output(self.feature_count, extracted.1)
    }
}

fn last_output_name(session: &Session) -> Result<String, AttributionError> {
    session
        .outputs
        .last()
        .map(|o| o.name.clone())
        .ok_or_else(|| AttributionError::Engine("No output defined".to_string()))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_row_decodes_to_single_positive() {
        let raw = decode_contrib_output(3, &[0.1, -0.25, 0.5, 0.75]).unwrap();
        assert_eq!(
            raw,
            RawAttribution::SinglePositive {
                values: vec![0.1f32 as f64, -0.25, 0.5],
                expected: 0.75,
            }
        );
    }

    #[test]
    fn test_double_row_decodes_to_per_class() {
        let raw = decode_contrib_output(2, &[0.1, 0.2, 1.0, -0.1, -0.2, -1.0]).unwrap();
        match raw {
            RawAttribution::PerClass { values, expected } => {
                assert_eq!(values.len(), 2);
                assert_eq!(values[1].len(), 2);
                assert_eq!(expected.len(), 2);
                assert_eq!(expected[1], -1.0);
            }
            other => panic!("unexpected shape: {:?}", other),
        }
    }

    #[test]
    fn test_unrecognized_length_is_shape_error() {
        assert!(matches!(
            decode_contrib_output(3, &[0.1, 0.2]),
            Err(AttributionError::Shape(_))
        ));
    }
}
