//! Explanation Service - shape normalization and canonical alignment
//!
//! Runs the attribution engine on the same column ordering the prediction
//! path used, selects the positive class regardless of which return shape
//! the engine produced, and re-aligns contributions to canonical feature
//! order. The compat call form is retried exactly once, and only on an
//! interface-mismatch failure of the primary form.

use crate::catalog::layout::{FEATURE_COUNT, FEATURE_LAYOUT};
use crate::catalog::vector::FeatureVector;

use super::engine::{AttributionEngine, AttributionError};
use super::types::{Explanation, RawAttribution};

/// Select the positive-class contribution array and expected value
///
/// Per-class engines list the positive class last, matching the upstream
/// engine convention.
pub fn select_positive_class(raw: RawAttribution) -> Result<(Vec<f64>, f64), AttributionError> {
    match raw {
        RawAttribution::SinglePositive { values, expected } => Ok((values, expected)),
        RawAttribution::PerClass { values, expected } => {
            let contributions = values
                .into_iter()
                .last()
                .ok_or_else(|| AttributionError::Shape("Empty class-wise values".to_string()))?;
            let baseline = expected
                .last()
                .copied()
                .ok_or_else(|| AttributionError::Shape("Empty expected values".to_string()))?;
            Ok((contributions, baseline))
        }
    }
}

/// Wraps an attribution engine with the prediction path's column ordering
pub struct ExplanationService {
    engine: Box<dyn AttributionEngine>,
    /// Model column j holds the value of canonical index column_map[j]
    column_map: Vec<usize>,
}

impl ExplanationService {
    pub fn new(engine: Box<dyn AttributionEngine>, column_map: Vec<usize>) -> Self {
        Self { engine, column_map }
    }

    pub fn explain(&self, vector: &FeatureVector) -> Result<Explanation, AttributionError> {
        let values = vector.as_array();
        let model_input: Vec<f64> = self.column_map.iter().map(|&i| values[i]).collect();

        let raw = match self.engine.attributions(&model_input) {
            Ok(raw) => raw,
            Err(AttributionError::InterfaceMismatch(msg)) => {
                log::debug!("Attribution primary call failed ({}), using compat form", msg);
                self.engine.attributions_compat(&model_input)?
            }
            Err(other) => return Err(other),
        };

        let (model_order_contribs, baseline_value) = select_positive_class(raw)?;

        if model_order_contribs.len() != FEATURE_COUNT {
            return Err(AttributionError::Shape(format!(
                "Got {} contributions for {} features",
                model_order_contribs.len(),
                FEATURE_COUNT
            )));
        }

        // Map contributions back from model column order to canonical order
        let mut contributions = vec![0.0f64; FEATURE_COUNT];
        for (j, &canonical_idx) in self.column_map.iter().enumerate() {
            contributions[canonical_idx] = model_order_contribs[j];
        }

        Ok(Explanation {
            baseline_value,
            contributions,
            feature_labels: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
            feature_values: values.to_vec(),
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn identity_map() -> Vec<usize> {
        (0..FEATURE_COUNT).collect()
    }

    /// Engine returning a fixed raw shape; optionally fails the primary form
    struct FixedEngine {
        raw: RawAttribution,
        primary_fails: bool,
        compat_fails: bool,
    }

    impl FixedEngine {
        fn new(raw: RawAttribution) -> Self {
            Self {
                raw,
                primary_fails: false,
                compat_fails: false,
            }
        }
    }

    impl AttributionEngine for FixedEngine {
        fn attributions(&self, _features: &[f64]) -> Result<RawAttribution, AttributionError> {
            if self.primary_fails {
                Err(AttributionError::InterfaceMismatch("signature changed".to_string()))
            } else {
                Ok(self.raw.clone())
            }
        }

        fn attributions_compat(&self, _features: &[f64]) -> Result<RawAttribution, AttributionError> {
            if self.compat_fails {
                Err(AttributionError::Engine("compat failed too".to_string()))
            } else {
                Ok(self.raw.clone())
            }
        }
    }

    fn per_class_raw() -> RawAttribution {
        // Negative class mirrors the positive class; positive is last
        let positive: Vec<f64> = (0..FEATURE_COUNT).map(|i| (i as f64 - 6.0) * 0.01).collect();
        let negative: Vec<f64> = positive.iter().map(|v| -v).collect();
        RawAttribution::PerClass {
            values: vec![negative, positive],
            expected: vec![2.5, -2.5],
        }
    }

    fn single_positive_raw() -> RawAttribution {
        let positive: Vec<f64> = (0..FEATURE_COUNT).map(|i| (i as f64 - 6.0) * 0.01).collect();
        RawAttribution::SinglePositive {
            values: positive,
            expected: -2.5,
        }
    }

    #[test]
    fn test_per_class_selects_positive_class() {
        let service = ExplanationService::new(Box::new(FixedEngine::new(per_class_raw())), identity_map());
        let explanation = service.explain(&FeatureVector::defaults()).unwrap();
        assert_eq!(explanation.baseline_value, -2.5);
        assert!((explanation.contributions[0] + 0.06).abs() < 1e-12);
    }

    #[test]
    fn test_both_shapes_yield_identical_explanations() {
        let vector = FeatureVector::defaults();

        let a = ExplanationService::new(Box::new(FixedEngine::new(per_class_raw())), identity_map())
            .explain(&vector)
            .unwrap();
        let b = ExplanationService::new(Box::new(FixedEngine::new(single_positive_raw())), identity_map())
            .explain(&vector)
            .unwrap();

        assert_eq!(a.baseline_value, b.baseline_value);
        assert_eq!(a.contributions, b.contributions);
        assert_eq!(a.feature_labels, b.feature_labels);
    }

    #[test]
    fn test_alignment_invariant() {
        let service = ExplanationService::new(Box::new(FixedEngine::new(per_class_raw())), identity_map());
        let explanation = service.explain(&FeatureVector::defaults()).unwrap();
        assert_eq!(explanation.contributions.len(), FEATURE_COUNT);
        assert_eq!(explanation.feature_labels.len(), FEATURE_COUNT);
        assert_eq!(explanation.feature_values.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_fidelity_identity() {
        let service = ExplanationService::new(Box::new(FixedEngine::new(per_class_raw())), identity_map());
        let explanation = service.explain(&FeatureVector::defaults()).unwrap();

        let expected_raw: f64 = -2.5 + (0..FEATURE_COUNT).map(|i| (i as f64 - 6.0) * 0.01).sum::<f64>();
        assert!((explanation.raw_score() - expected_raw).abs() < 1e-9);
    }

    #[test]
    fn test_compat_retry_on_interface_mismatch() {
        let mut engine = FixedEngine::new(single_positive_raw());
        engine.primary_fails = true;
        let engine = Box::new(engine);

        let service = ExplanationService::new(engine, identity_map());
        let explanation = service.explain(&FeatureVector::defaults()).unwrap();
        assert_eq!(explanation.baseline_value, -2.5);
    }

    #[test]
    fn test_both_forms_failing_is_fatal() {
        let mut engine = FixedEngine::new(single_positive_raw());
        engine.primary_fails = true;
        engine.compat_fails = true;

        let service = ExplanationService::new(Box::new(engine), identity_map());
        assert!(service.explain(&FeatureVector::defaults()).is_err());
    }

    #[test]
    fn test_non_mismatch_failure_skips_compat() {
        struct ShapeFailEngine {
            compat_called: Rc<Cell<bool>>,
        }
        impl AttributionEngine for ShapeFailEngine {
            fn attributions(&self, _f: &[f64]) -> Result<RawAttribution, AttributionError> {
                Err(AttributionError::Shape("bad output".to_string()))
            }
            fn attributions_compat(&self, _f: &[f64]) -> Result<RawAttribution, AttributionError> {
                self.compat_called.set(true);
                Err(AttributionError::Engine("should not be reached".to_string()))
            }
        }

        let compat_called = Rc::new(Cell::new(false));
        let service = ExplanationService::new(
            Box::new(ShapeFailEngine {
                compat_called: Rc::clone(&compat_called),
            }),
            identity_map(),
        );
        let result = service.explain(&FeatureVector::defaults());
        assert!(matches!(result, Err(AttributionError::Shape(_))));
        assert!(!compat_called.get());
    }

    #[test]
    fn test_shuffled_columns_map_back_to_canonical() {
        // Model order: canonical reversed
        let column_map: Vec<usize> = (0..FEATURE_COUNT).rev().collect();
        // Contribution for model column j is j * 0.1
        let model_contribs: Vec<f64> = (0..FEATURE_COUNT).map(|j| j as f64 * 0.1).collect();
        let engine = FixedEngine::new(RawAttribution::SinglePositive {
            values: model_contribs,
            expected: 0.0,
        });

        let service = ExplanationService::new(Box::new(engine), column_map);
        let explanation = service.explain(&FeatureVector::defaults()).unwrap();

        // Model column 0 is canonical index 12 (Creatinine)
        assert_eq!(explanation.contributions[12], 0.0);
        assert_eq!(explanation.contributions[0], (FEATURE_COUNT - 1) as f64 * 0.1);
    }
}
