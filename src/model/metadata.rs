//! Model artifact metadata and companion feature-list loading
//!
//! The persisted classifier ships with a companion JSON file declaring the
//! raw feature names it was trained on, in required column order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Metadata for a loaded model artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub model_type: String,
    pub feature_count: usize,
    pub loaded_at: DateTime<Utc>,
}

impl ModelMetadata {
    pub fn new(model_path: &str, model_type: &str, feature_count: usize) -> Self {
        Self {
            model_path: model_path.to_string(),
            model_type: model_type.to_string(),
            feature_count,
            loaded_at: Utc::now(),
        }
    }
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug)]
pub struct ArtifactError(pub String);

impl std::fmt::Display for ArtifactError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ArtifactError: {}", self.0)
    }
}

impl std::error::Error for ArtifactError {}

// ============================================================================
// FEATURE LIST LOADING
// ============================================================================

/// Load the declared raw feature list (JSON array of strings)
pub fn load_feature_list(path: impl AsRef<Path>) -> Result<Vec<String>, ArtifactError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| ArtifactError(format!("Cannot read feature list {}: {}", path.display(), e)))?;

    let names: Vec<String> = serde_json::from_str(&text)
        .map_err(|e| ArtifactError(format!("Malformed feature list {}: {}", path.display(), e)))?;

    if names.is_empty() {
        return Err(ArtifactError(format!(
            "Feature list {} declares no features",
            path.display()
        )));
    }

    log::info!("Loaded {} declared features from {}", names.len(), path.display());
    Ok(names)
}

// ============================================================================
// TESTS
// ============================================================================
