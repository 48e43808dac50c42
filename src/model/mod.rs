//! Model loading and prediction
//!
//! - `metadata` - artifact metadata and companion feature list
//! - `classifier` - the classifier contract and ONNX backend
//! - `inference` - the prediction service (column alignment, probability)

pub mod classifier;
pub mod inference;
pub mod metadata;

pub use classifier::{Classifier, InferenceError, OnnxClassifier};
pub use inference::{PredictionResult, PredictionService, PreconditionError};
pub use metadata::{load_feature_list, ArtifactError, ModelMetadata};
