//! Feature Specs - Display labels, defaults, valid ranges
//!
//! One entry per feature in FEATURE_LAYOUT order. Defaults are the
//! population medians shipped with the model artifact; ranges are the
//! physiologically plausible bounds enforced on free-text input.

use super::layout::FEATURE_COUNT;

/// Static definition of one clinical feature
#[derive(Debug, Clone, Copy)]
pub struct FeatureSpec {
    pub canonical_name: &'static str,
    pub display_label: &'static str,
    pub default_value: f64,
    pub valid_range: Option<(f64, f64)>,
}

/// Authoritative spec table, aligned 1:1 with FEATURE_LAYOUT
pub const FEATURE_SPECS: [FeatureSpec; FEATURE_COUNT] = [
    FeatureSpec {
        canonical_name: "SBP",
        display_label: "Systolic Blood Pressure (SBP) - mmHg",
        default_value: 122.5,
        valid_range: Some((30.0, 300.0)),
    },
    FeatureSpec {
        canonical_name: "DBP",
        display_label: "Diastolic Blood Pressure (DBP) - mmHg",
        default_value: 84.8,
        valid_range: Some((10.0, 200.0)),
    },
    FeatureSpec {
        canonical_name: "APS_III",
        display_label: "Acute Physiology Score III (APSIII)",
        default_value: 29.0,
        valid_range: Some((0.0, 299.0)),
    },
    FeatureSpec {
        canonical_name: "WBC",
        display_label: "White Blood Cell Count (WBC) - 10^3/uL",
        default_value: 7.9,
        valid_range: Some((0.0, 500.0)),
    },
    FeatureSpec {
        canonical_name: "PLT",
        display_label: "Platelet Count (PLT) - 10^3/uL",
        default_value: 165.4,
        valid_range: Some((0.0, 2000.0)),
    },
    FeatureSpec {
        canonical_name: "AG",
        display_label: "Anion Gap (AG) - mmol/L",
        default_value: 9.0,
        valid_range: Some((0.0, 60.0)),
    },
    FeatureSpec {
        canonical_name: "HCO3",
        display_label: "Bicarbonate (HCO3-) - mmol/L",
        default_value: 21.0,
        valid_range: Some((0.0, 60.0)),
    },
    FeatureSpec {
        canonical_name: "RDW",
        display_label: "Red Cell Distribution Width (RDW) - fL",
        default_value: 15.3,
        valid_range: Some((5.0, 40.0)),
    },
    FeatureSpec {
        canonical_name: "Na",
        display_label: "Sodium (Na+) - mmol/L",
        default_value: 137.3,
        valid_range: Some((100.0, 200.0)),
    },
    FeatureSpec {
        canonical_name: "BUN",
        display_label: "Blood Urea Nitrogen (BUN) - mg/dL",
        default_value: 14.7,
        valid_range: Some((0.0, 300.0)),
    },
    FeatureSpec {
        canonical_name: "Temp",
        display_label: "Body Temperature (Temp) - degC",
        default_value: 37.0,
        valid_range: Some((25.0, 45.0)),
    },
    FeatureSpec {
        canonical_name: "Lac",
        display_label: "Lactate (Lac) - mmol/L",
        default_value: 0.9,
        valid_range: Some((0.0, 30.0)),
    },
    FeatureSpec {
        canonical_name: "Creatinine",
        display_label: "Creatinine (Cre) - mg/dL",
        default_value: 0.9,
        valid_range: Some((0.0, 40.0)),
    },
];

/// Look up the spec for a canonical name
pub fn spec_for(name: &str) -> Option<&'static FeatureSpec> {
    FEATURE_SPECS.iter().find(|s| s.canonical_name == name)
}

/// Display label for a canonical name (falls back to the name itself)
pub fn display_label(name: &str) -> &str {
    match spec_for(name) {
        Some(spec) => spec.display_label,
        None => name,
    }
}

// ============================================================================
// TESTS
// ============================================================================
