//! Render payload - the record handed to the external renderer
//!
//! The pipeline ends here. Drawing a force plot, laying out a one-page
//! report or exporting a PDF is the downstream renderer's job; this module
//! only serializes everything that renderer needs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::layout::LayoutInfo;
use crate::catalog::specs::display_label;
use crate::input::parse::FieldWarning;
use crate::pipeline::PipelineOutput;

/// One feature row in the payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureRow {
    pub name: String,
    pub label: String,
    pub value: f64,
    /// Signed attribution: positive pushes predicted risk up
    pub contribution: f64,
}

/// Complete render payload for one request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderPayload {
    /// Positive-class probability in [0, 1]
    pub probability: f64,
    /// Display scaling: 0-100
    pub probability_pct: f64,
    /// Expected model output with no feature-specific evidence
    pub baseline_value: f64,
    pub features: Vec<FeatureRow>,
    pub warnings: Vec<FieldWarning>,
    pub layout: LayoutInfo,
    pub generated_at: DateTime<Utc>,
}

impl RenderPayload {
    pub fn from_output(output: &PipelineOutput) -> Self {
        let features = output
            .explanation
            .feature_labels
            .iter()
            .zip(output.explanation.feature_values.iter())
            .zip(output.explanation.contributions.iter())
            .map(|((name, &value), &contribution)| FeatureRow {
                name: name.clone(),
                label: display_label(name).to_string(),
                value,
                contribution,
            })
            .collect();

        Self {
            probability: output.prediction.probability,
            probability_pct: output.prediction.as_percent(),
            baseline_value: output.explanation.baseline_value,
            features,
            warnings: output.warnings.clone(),
            layout: LayoutInfo::current(),
            generated_at: Utc::now(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

// ============================================================================
// TESTS
// ============================================================================
