//! Input handling - parsing and validation of user-entered values

pub mod parse;

pub use parse::{build_vector, build_vector_from_widgets, parse_field, FieldWarning, ParseOutcome};
