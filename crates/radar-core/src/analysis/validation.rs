//! Validation boundary for provider output.
//!
//! Model output is untrusted text. It is accepted as an [`AnalysisResult`]
//! only after strict deserialization and range checks.

use serde::de::IgnoredAny;
use tracing::{debug, warn};

use super::model::{AnalysisResult, SentimentDistribution};
use crate::error::{RadarError, RadarResult};

/// Allowed drift of the distribution total away from 100 before a warning.
const DISTRIBUTION_TOLERANCE: f64 = 1.0;

/// Result of analysis validation.
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// Violations that reject the response.
    pub errors: Vec<String>,
    /// Quality issues that are logged but accepted.
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: String) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}

/// Parse raw provider text into a validated [`AnalysisResult`].
///
/// Accepts a bare JSON object, a fenced ```json block, or an object
/// surrounded by prose. Missing required fields, wrong types and unknown
/// sentiment labels fail deserialization; range violations fail
/// [`validate_analysis`].
pub fn parse_analysis(raw: &str) -> RadarResult<AnalysisResult> {
    let json = extract_json(raw);
    debug!(len = json.len(), "Parsing analysis payload");

    let result: AnalysisResult = serde_json::from_str(json)
        .map_err(|e| RadarError::validation(format!("malformed analysis: {}", e)))?;

    let report = validate_analysis(&result);
    for warning in &report.warnings {
        warn!(company = %result.company_name, "{}", warning);
    }

    if !report.is_valid() {
        return Err(RadarError::validation(report.errors.join("; ")));
    }

    Ok(result)
}

/// Check the semantic rules serde cannot express.
pub fn validate_analysis(result: &AnalysisResult) -> ValidationReport {
    let mut report = ValidationReport::default();

    if result.company_name.trim().is_empty() {
        report.add_error("companyName is empty".to_string());
    }

    if result.summary.trim().is_empty() {
        report.add_error("summary is empty".to_string());
    }

    if result.overall_score > 100 {
        report.add_error(format!(
            "overallScore {} is outside [0, 100]",
            result.overall_score
        ));
    }

    check_distribution(&result.sentiment_distribution, &mut report);

    for (i, topic) in result.topics.iter().enumerate() {
        if !in_range(topic.sentiment_score, 0.0, 100.0) {
            report.add_error(format!(
                "topics[{}] '{}' sentimentScore {} is outside [0, 100]",
                i, topic.topic, topic.sentiment_score
            ));
        }
        if !in_range(topic.volume, 1.0, 10.0) {
            report.add_error(format!(
                "topics[{}] '{}' volume {} is outside [1, 10]",
                i, topic.topic, topic.volume
            ));
        }
    }

    for (i, review) in result.reviews.iter().enumerate() {
        if review.snippet.trim().is_empty() {
            report.add_warning(format!("reviews[{}] from '{}' has an empty snippet", i, review.platform));
        }
    }

    report
}

fn check_distribution(dist: &SentimentDistribution, report: &mut ValidationReport) {
    let parts = [
        ("positive", dist.positive),
        ("neutral", dist.neutral),
        ("negative", dist.negative),
    ];

    let mut well_formed = true;
    for (name, value) in parts {
        if !value.is_finite() || value < 0.0 {
            report.add_error(format!("sentimentDistribution.{} {} is not a non-negative number", name, value));
            well_formed = false;
        }
    }

    if well_formed && (dist.total() - 100.0).abs() > DISTRIBUTION_TOLERANCE {
        report.add_warning(format!(
            "sentimentDistribution sums to {} instead of 100",
            dist.total()
        ));
    }
}

fn in_range(value: f64, min: f64, max: f64) -> bool {
    value.is_finite() && value >= min && value <= max
}

/// Extract a JSON object from text that may be wrapped in a markdown fence
/// or surrounded by prose.
///
/// Text that already parses as a JSON object is returned untouched, so
/// backticks inside string values never count as a fence.
fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();

    if trimmed.starts_with('{') && serde_json::from_str::<IgnoredAny>(trimmed).is_ok() {
        return trimmed;
    }

    if let Some(start) = trimmed.find("```") {
        let after_marker = &trimmed[start + 3..];
        // Skip the info string (`json`, `JSON`, ...) that ends at the first newline.
        let body = match after_marker.find('\n') {
            Some(nl) if !after_marker[..nl].contains('{') => &after_marker[nl + 1..],
            _ => after_marker.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
        };
        if let Some(end) = body.rfind("```") {
            return body[..end].trim();
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if end > start {
            return &trimmed[start..=end];
        }
    }

    trimmed
}
