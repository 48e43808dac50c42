//! Clinical AI Core - prediction/explanation pipeline
//!
//! Collects thirteen bedside vital-sign and lab values, runs a pre-trained
//! in-hospital mortality classifier, and produces a per-feature attribution
//! explanation. Presentation is a downstream concern; this crate ends at a
//! serialized render payload.

pub mod catalog;
pub mod config;
pub mod error;
pub mod explain;
pub mod input;
pub mod model;
pub mod pipeline;
pub mod report;
