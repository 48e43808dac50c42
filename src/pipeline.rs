//! Pipeline orchestration - one request end to end
//!
//! user input -> parser/validator -> prediction -> explanation -> payload.
//! Services are constructed once at startup and shared read-only across
//! requests; every request produces its own vector, result and explanation.

use std::collections::HashMap;

use crate::catalog::vector::FeatureVector;
use crate::error::PipelineResult;
use crate::explain::engine::AttributionEngine;
use crate::explain::service::ExplanationService;
use crate::explain::types::Explanation;
use crate::input::parse::{build_vector, build_vector_from_widgets, FieldWarning};
use crate::model::classifier::Classifier;
use crate::model::inference::{PredictionResult, PredictionService};

/// Everything one completed request produces
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub vector: FeatureVector,
    pub prediction: PredictionResult,
    pub explanation: Explanation,
    pub warnings: Vec<FieldWarning>,
}

/// The assembled prediction/explanation pipeline
pub struct Pipeline {
    prediction: PredictionService,
    explanation: ExplanationService,
}

impl Pipeline {
    /// Wire the services together; fails fast on a feature-set mismatch
    pub fn new(
        classifier: Box<dyn Classifier>,
        engine: Box<dyn AttributionEngine>,
    ) -> PipelineResult<Self> {
        let prediction = PredictionService::new(classifier)?;
        let explanation = ExplanationService::new(engine, prediction.column_map().to_vec());

        Ok(Self {
            prediction,
            explanation,
        })
    }

    /// One request from free-text fields
    pub fn run(&self, texts: &HashMap<String, String>) -> PipelineResult<PipelineOutput> {
        let (vector, warnings) = build_vector(texts);
        self.run_vector(vector, warnings)
    }

    /// One request from pre-constrained widget values
    pub fn run_widgets(&self, widgets: &HashMap<String, i64>) -> PipelineResult<PipelineOutput> {
        let vector = build_vector_from_widgets(widgets);
        self.run_vector(vector, Vec::new())
    }

    fn run_vector(
        &self,
        vector: FeatureVector,
        warnings: Vec<FieldWarning>,
    ) -> PipelineResult<PipelineOutput> {
        let prediction = self.prediction.predict(&vector)?;
        log::info!(
            "Predicted mortality {:.2}% in {}us",
            prediction.as_percent(),
            prediction.inference_time_us
        );

        let explanation = self.explanation.explain(&vector)?;

        Ok(PipelineOutput {
            vector,
            prediction,
            explanation,
            warnings,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::layout::FEATURE_COUNT;
    use crate::error::PipelineError;
    use crate::explain::engine::AttributionError;
    use crate::explain::types::RawAttribution;
    use crate::model::classifier::InferenceError;

    /// Deterministic mock: logistic of a fixed weighted sum
    struct MockClassifier {
        names: Vec<String>,
        weights: Vec<f64>,
        bias: f64,
    }

    impl MockClassifier {
        fn standard() -> Self {
            let names: Vec<String> = [
                "SB", "DB", "score1", "score2", "score6", "score7", "score8", "SC1", "Na",
                "BUN", "T", "Lac", "Cre",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect();
            let weights: Vec<f64> = (0..FEATURE_COUNT).map(|i| 0.001 * (i as f64 + 1.0)).collect();
            Self {
                names,
                weights,
                bias: -1.2,
            }
        }

        fn margin(&self, features: &[f64]) -> f64 {
            self.bias
                + self
                    .weights
                    .iter()
                    .zip(features.iter())
                    .map(|(w, x)| w * x)
                    .sum::<f64>()
        }
    }

    impl Classifier for MockClassifier {
        fn model_name(&self) -> &str {
            "mock-lgbm"
        }
        fn raw_feature_names(&self) -> &[String] {
            &self.names
        }
        fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError> {
            let margin = self.margin(features);
            let positive = 1.0 / (1.0 + (-margin).exp());
            Ok(vec![1.0 - positive, positive])
        }
    }

    /// Mock engine consistent with MockClassifier's margin, satisfying
    /// baseline + sum(contributions) == margin exactly
    struct MockEngine {
        weights: Vec<f64>,
        bias: f64,
        shape_per_class: bool,
    }

    impl AttributionEngine for MockEngine {
        fn attributions(&self, features: &[f64]) -> Result<RawAttribution, AttributionError> {
            let contribs: Vec<f64> = self
                .weights
                .iter()
                .zip(features.iter())
                .map(|(w, x)| w * x)
                .collect();

            if self.shape_per_class {
                let negated: Vec<f64> = contribs.iter().map(|c| -c).collect();
                Ok(RawAttribution::PerClass {
                    values: vec![negated, contribs],
                    expected: vec![-self.bias, self.bias],
                })
            } else {
                Ok(RawAttribution::SinglePositive {
                    values: contribs,
                    expected: self.bias,
                })
            }
        }
    }

    fn standard_pipeline(shape_per_class: bool) -> Pipeline {
        let classifier = MockClassifier::standard();
        let engine = MockEngine {
            weights: classifier.weights.clone(),
            bias: classifier.bias,
            shape_per_class,
        };
        Pipeline::new(Box::new(classifier), Box::new(engine)).unwrap()
    }

    #[test]
    fn test_scenario_defaults_end_to_end() {
        // All fields left at their documented defaults
        let pipeline = standard_pipeline(true);
        let output = pipeline.run(&HashMap::new()).unwrap();

        assert!(output.warnings.is_empty());
        assert!(output.prediction.probability > 0.0 && output.prediction.probability < 1.0);
        assert_eq!(output.explanation.contributions.len(), 13);
        assert_eq!(output.explanation.feature_labels.len(), 13);

        // Deterministic: a second run yields the identical probability
        let again = pipeline.run(&HashMap::new()).unwrap();
        assert_eq!(output.prediction.probability, again.prediction.probability);
    }

    #[test]
    fn test_scenario_scientific_notation_input() {
        let pipeline = standard_pipeline(false);
        let mut texts = HashMap::new();
        texts.insert("SBP".to_string(), "1e2".to_string());

        let output = pipeline.run(&texts).unwrap();
        assert!(output.warnings.is_empty());
        assert_eq!(output.vector.get_by_name("SBP"), Some(100.0));
    }

    #[test]
    fn test_scenario_empty_field_warns_and_proceeds() {
        let pipeline = standard_pipeline(true);
        let mut texts = HashMap::new();
        texts.insert("RDW".to_string(), "".to_string());

        let output = pipeline.run(&texts).unwrap();
        assert_eq!(output.warnings.len(), 1);
        assert_eq!(output.warnings[0].feature, "RDW");
        assert_eq!(output.vector.get_by_name("RDW"), Some(15.3));
        assert!(output.prediction.probability > 0.0);
    }

    #[test]
    fn test_explanation_identity_against_raw_margin() {
        let pipeline = standard_pipeline(true);
        let classifier = MockClassifier::standard();

        let output = pipeline.run(&HashMap::new()).unwrap();
        let model_input: Vec<f64> = {
            // Reconstruct model order the way the service does
            let names = crate::catalog::names::normalize_names(classifier.raw_feature_names());
            names
                .iter()
                .map(|n| output.vector.get_by_name(n).unwrap())
                .collect()
        };

        let raw = classifier.margin(&model_input);
        assert!((output.explanation.raw_score() - raw).abs() < 1e-9);
    }

    #[test]
    fn test_widget_mode_runs_without_warnings() {
        let pipeline = standard_pipeline(false);
        let mut widgets = HashMap::new();
        widgets.insert("APS_III".to_string(), 88i64);

        let output = pipeline.run_widgets(&widgets).unwrap();
        assert!(output.warnings.is_empty());
        assert_eq!(output.vector.get_by_name("APS_III"), Some(88.0));
    }

    #[test]
    fn test_incompatible_model_fails_at_wiring() {
        let mut classifier = MockClassifier::standard();
        classifier.names.truncate(10);
        let engine = MockEngine {
            weights: classifier.weights.clone(),
            bias: classifier.bias,
            shape_per_class: false,
        };

        let result = Pipeline::new(Box::new(classifier), Box::new(engine));
        assert!(matches!(result, Err(PipelineError::Precondition(_))));
    }
}
