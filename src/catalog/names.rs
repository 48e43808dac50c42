//! Name Normalizer - Raw artifact identifiers to canonical names
//!
//! Persisted model artifacts declare their columns under training-time
//! identifiers (`SB`, `score1`, `SC1`...). Everything downstream speaks
//! canonical names, so the declared list is rewritten through a fixed
//! table at the boundary.
//!
//! Contract: output length and order always equal input length and order.
//! Unmapped names pass through verbatim; there is no error case.

/// Raw identifier -> canonical name, one row per known training column
static RAW_NAME_MAP: &[(&str, &str)] = &[
    ("SB", "SBP"),
    ("DB", "DBP"),
    ("T", "Temp"),
    ("score1", "APS_III"),
    ("score2", "WBC"),
    ("score6", "PLT"),
    ("score7", "AG"),
    ("score8", "HCO3"),
    ("SC1", "RDW"),
    ("Cre", "Creatinine"),
    // Na, BUN and Lac already arrive canonical; pass-through covers them.
];

/// Normalize one raw identifier
pub fn normalize_name(raw: &str) -> &str {
    for (from, to) in RAW_NAME_MAP {
        if *from == raw {
            return to;
        }
    }
    raw
}

/// Normalize a declared column list, preserving length and order
pub fn normalize_names(raw: &[String]) -> Vec<String> {
    raw.iter().map(|n| normalize_name(n).to_string()).collect()
}

// ============================================================================
// TESTS
// ============================================================================
