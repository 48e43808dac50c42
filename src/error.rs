//! Error handling

use crate::explain::engine::AttributionError;
use crate::model::classifier::InferenceError;
use crate::model::inference::PreconditionError;
use crate::model::metadata::ArtifactError;

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Fatal pipeline errors, by taxonomy
///
/// Field-level validation problems never appear here; they are absorbed
/// into default substitution and reported as warnings.
#[derive(Debug)]
pub enum PipelineError {
    /// Assembled feature set does not match the model's requirements
    Precondition(String),

    /// Classifier failure, surfaced verbatim
    Inference(String),

    /// Attribution engine failure after the compat retry
    Attribution(String),

    /// Artifact loading/parsing failure at startup
    Artifact(String),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Precondition(msg) => write!(f, "Precondition failure: {}", msg),
            PipelineError::Inference(msg) => write!(f, "Inference failure: {}", msg),
            PipelineError::Attribution(msg) => write!(f, "Attribution failure: {}", msg),
            PipelineError::Artifact(msg) => write!(f, "Artifact failure: {}", msg),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<PreconditionError> for PipelineError {
    fn from(err: PreconditionError) -> Self {
        PipelineError::Precondition(err.to_string())
    }
}

impl From<InferenceError> for PipelineError {
    fn from(err: InferenceError) -> Self {
        PipelineError::Inference(err.0)
    }
}

impl From<AttributionError> for PipelineError {
    fn from(err: AttributionError) -> Self {
        PipelineError::Attribution(err.to_string())
    }
}

impl From<ArtifactError> for PipelineError {
    fn from(err: ArtifactError) -> Self {
        PipelineError::Artifact(err.0)
    }
}
