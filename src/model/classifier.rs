//! Classifier backend - ONNX Runtime integration
//!
//! The persisted classifier is an opaque artifact exposing one operation:
//! per-class probabilities for a fixed-order numeric feature vector. The
//! `Classifier` trait is that contract; `OnnxClassifier` is the shipped
//! backend.

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;
use std::path::Path;

use super::metadata::{load_feature_list, ArtifactError, ModelMetadata};

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug)]
pub struct InferenceError(pub String);

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InferenceError: {}", self.0)
    }
}

impl std::error::Error for InferenceError {}

// ============================================================================
// CLASSIFIER CONTRACT
// ============================================================================

/// Contract of a loaded binary classifier
///
/// `raw_feature_names` is the artifact's declared column list, in the order
/// the model requires; `predict_proba` takes values already in that order
/// and returns per-class probabilities with the positive class last.
pub trait Classifier {
    fn model_name(&self) -> &str;
    fn raw_feature_names(&self) -> &[String];
    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError>;
}

// ============================================================================
// ONNX IMPLEMENTATION
// ============================================================================

/// ONNX-backed classifier
///
/// The session is read-only after construction; the mutex exists because
/// the runtime's `run` requires exclusive access.
pub struct OnnxClassifier {
    session: Mutex<Session>,
    raw_feature_names: Vec<String>,
    metadata: ModelMetadata,
}

impl OnnxClassifier {
    /// Load the model artifact and its companion feature list
    pub fn load(
        model_path: impl AsRef<Path>,
        feature_list_path: impl AsRef<Path>,
    ) -> Result<Self, ArtifactError> {
        let model_path = model_path.as_ref();
        log::info!("Loading classifier artifact from: {}", model_path.display());

        if !model_path.exists() {
            return Err(ArtifactError(format!(
                "Model not found: {}",
                model_path.display()
            )));
        }

        let session = Session::builder()
            .map_err(|e| ArtifactError(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ArtifactError(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| ArtifactError(format!("Failed to load model: {}", e)))?;

        let raw_feature_names = load_feature_list(feature_list_path)?;
        let metadata = ModelMetadata::new(
            &model_path.display().to_string(),
            "lgbm-dart",
            raw_feature_names.len(),
        );

        log::info!("Classifier artifact loaded successfully");

        Ok(Self {
            session: Mutex::new(session),
            raw_feature_names,
            metadata,
        })
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

impl Classifier for OnnxClassifier {
    fn model_name(&self) -> &str {
        &self.metadata.model_path
    }

    fn raw_feature_names(&self) -> &[String] {
        &self.raw_feature_names
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError> {
        let n = self.raw_feature_names.len();
        if features.len() != n {
            return Err(InferenceError(format!(
                "Expected {} features, got {}",
                n,
                features.len()
            )));
        }

        let input_data: Vec<f32> = features.iter().map(|&v| v as f32).collect();
        let input_array = Array2::<f32>::from_shape_vec((1, n), input_data)
            .map_err(|e| InferenceError(format!("Array error: {}", e)))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| InferenceError(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();

        // Classifier exports list the probability tensor as the last output
        let output_name = session
            .outputs
            .last()
            .map(|o| o.name.clone())
            .ok_or_else(|| InferenceError("No output defined".to_string()))?;

        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(&output_name)
            .ok_or_else(|| InferenceError("No output".to_string()))?;

        let output_tensor = output
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError(format!("Extract error: {}", e)))?;

        let data = output_tensor.1;
        if data.is_empty() {
            return Err(InferenceError("Empty probability output".to_string()));
        }

        Ok(data.iter().map(|&v| v as f64).collect())
    }
}
