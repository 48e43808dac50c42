//! Configuration module

use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the serialized classifier artifact
    pub model_path: String,

    /// Path to the companion declared-feature list (JSON array)
    pub feature_list_path: String,

    /// Path to the companion attribution (contribution) artifact
    pub attribution_path: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            model_path: env::var("CLINICAL_MODEL_PATH")
                .unwrap_or_else(|_| "result/mortality_model.onnx".to_string()),

            feature_list_path: env::var("CLINICAL_FEATURES_PATH")
                .unwrap_or_else(|_| "result/mortality_features.json".to_string()),

            attribution_path: env::var("CLINICAL_ATTRIB_PATH")
                .unwrap_or_else(|_| "result/mortality_contrib.onnx".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_env_unset() {
        // Env may carry overrides in CI; only assert non-empty paths
        let config = Config::from_env();
        assert!(!config.model_path.is_empty());
        assert!(!config.feature_list_path.is_empty());
        assert!(!config.attribution_path.is_empty());
    }
}
