//! Explanation - per-feature attribution of one prediction
//!
//! - `types` - raw engine shapes and the normalized Explanation
//! - `engine` - the attribution engine contract and ONNX backend
//! - `service` - shape normalization, positive-class selection, alignment

pub mod engine;
pub mod service;
pub mod types;

pub use engine::{AttributionEngine, AttributionError, OnnxAttribution};
pub use service::ExplanationService;
pub use types::{Explanation, RawAttribution};
