//! Input Parser/Validator - free text to validated feature values
//!
//! Every field is parsed against a numeric-literal grammar (optional
//! sign, optional decimal point, optional exponent). Anything that fails
//! the grammar or lands outside the feature's valid range is replaced by
//! the catalog default and recorded as a non-fatal warning. Parsing never
//! propagates an error past this boundary; default substitution is the
//! designed recovery path, not an exception.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::catalog::layout::FEATURE_COUNT;
use crate::catalog::specs::{FeatureSpec, FEATURE_SPECS};
use crate::catalog::vector::FeatureVector;

/// Numeric literal grammar: sign, digits, optional fraction, optional exponent
static NUM_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?$").unwrap());

// ============================================================================
// WARNINGS
// ============================================================================

/// Non-fatal, field-level validation warning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldWarning {
    pub feature: String,
    pub rejected_text: String,
    pub substituted_default: f64,
}

impl std::fmt::Display for FieldWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: invalid number '{}', fallback to default {}",
            self.feature, self.rejected_text, self.substituted_default
        )
    }
}

// ============================================================================
// PARSE OUTCOME
// ============================================================================

/// Two-outcome parse result: validated value, or the default plus a warning
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Accepted(f64),
    Defaulted { value: f64, warning: FieldWarning },
}

impl ParseOutcome {
    pub fn value(&self) -> f64 {
        match self {
            ParseOutcome::Accepted(v) => *v,
            ParseOutcome::Defaulted { value, .. } => *value,
        }
    }

    pub fn warning(&self) -> Option<&FieldWarning> {
        match self {
            ParseOutcome::Accepted(_) => None,
            ParseOutcome::Defaulted { warning, .. } => Some(warning),
        }
    }
}

// ============================================================================
// FIELD PARSING
// ============================================================================

fn defaulted(spec: &FeatureSpec, rejected: &str) -> ParseOutcome {
    ParseOutcome::Defaulted {
        value: spec.default_value,
        warning: FieldWarning {
            feature: spec.canonical_name.to_string(),
            rejected_text: rejected.to_string(),
            substituted_default: spec.default_value,
        },
    }
}

/// Parse one free-text field against its spec
///
/// Empty strings fail the grammar and take the same substitution path as
/// any other malformed text.
pub fn parse_field(spec: &FeatureSpec, text: &str) -> ParseOutcome {
    let trimmed = text.trim();

    if !NUM_PATTERN.is_match(trimmed) {
        return defaulted(spec, trimmed);
    }

    let value = match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => return defaulted(spec, trimmed),
    };

    if let Some((min, max)) = spec.valid_range {
        if value < min || value > max {
            return defaulted(spec, trimmed);
        }
    }

    ParseOutcome::Accepted(value)
}

/// Accept a pre-constrained numeric widget value as-is
///
/// The stepper surface already clamps to an integer inside the valid
/// range, so no further validation applies here.
pub fn from_widget(_spec: &FeatureSpec, value: i64) -> f64 {
    value as f64
}

// ============================================================================
// VECTOR ASSEMBLY
// ============================================================================

/// Build a complete feature vector from per-field raw text
///
/// Fields absent from `texts` are treated as pre-filled with the default's
/// literal text, matching the input surface's behavior. Returns the vector
/// plus every warning raised along the way.
pub fn build_vector(texts: &HashMap<String, String>) -> (FeatureVector, Vec<FieldWarning>) {
    let mut values = [0.0f64; FEATURE_COUNT];
    let mut warnings = Vec::new();

    for (slot, spec) in values.iter_mut().zip(FEATURE_SPECS.iter()) {
        let default_text = spec.default_value.to_string();
        let text = texts
            .get(spec.canonical_name)
            .map(String::as_str)
            .unwrap_or(&default_text);

        let outcome = parse_field(spec, text);
        if let Some(warning) = outcome.warning() {
            log::warn!("{}", warning);
            warnings.push(warning.clone());
        }
        *slot = outcome.value();
    }

    (FeatureVector::from_values(values), warnings)
}

/// Build a complete feature vector from widget values
pub fn build_vector_from_widgets(widgets: &HashMap<String, i64>) -> FeatureVector {
    let mut values = [0.0f64; FEATURE_COUNT];

    for (slot, spec) in values.iter_mut().zip(FEATURE_SPECS.iter()) {
        *slot = match widgets.get(spec.canonical_name) {
            Some(&v) => from_widget(spec, v),
            None => spec.default_value,
        };
    }

    FeatureVector::from_values(values)
}

// ============================================================================
// TESTS
// ============================================================================
