//! Feature Catalog - clinical feature schema, names and vectors
//!
//! - `layout` - canonical ordering, versioning, layout hash
//! - `specs` - display labels, defaults, valid ranges
//! - `names` - raw artifact identifier normalization
//! - `vector` - the request-scoped feature vector

pub mod layout;
pub mod names;
pub mod specs;
pub mod vector;

pub use layout::{feature_index, feature_name, layout_hash, LayoutInfo, FEATURE_COUNT, FEATURE_LAYOUT};
pub use names::{normalize_name, normalize_names};
pub use specs::{display_label, spec_for, FeatureSpec, FEATURE_SPECS};
pub use vector::FeatureVector;
