//! Analysis result contract.
//!
//! Defines the report shape exchanged with the provider and the
//! parse-and-reject boundary every provider response passes through.

pub mod model;
pub mod validation;

pub use schemars::schema::RootSchema;

use model::AnalysisResult;

pub use validation::{parse_analysis, validate_analysis, ValidationReport};

/// JSON Schema of [`AnalysisResult`] for external harnesses and renderers.
pub fn analysis_schema() -> RootSchema {
    schemars::schema_for!(AnalysisResult)
}
