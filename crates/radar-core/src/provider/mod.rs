//! Analysis provider abstraction.
//!
//! A provider turns a free-text company query into a validated
//! [`AnalysisResult`]. The controller treats it as a black box.

pub mod gemini;
pub mod prompts;

use async_trait::async_trait;

use crate::analysis::model::AnalysisResult;
use crate::error::RadarResult;

pub use gemini::GeminiClient;

/// Trait for analysis providers.
///
/// Implementations must pass model output through
/// [`crate::analysis::parse_analysis`] before returning it.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Produce a sentiment report for the query.
    async fn analyze(&self, query: &str) -> RadarResult<AnalysisResult>;
}
