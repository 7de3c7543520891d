//! Analysis domain model.
//!
//! The report a provider produces for one company query. Field names on the
//! wire are camelCase.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Topic scores strictly above this are read as positive.
pub const POSITIVE_THRESHOLD: f64 = 60.0;

/// Topic scores strictly below this are read as negative.
pub const NEGATIVE_THRESHOLD: f64 = 40.0;

/// Complete sentiment report for one company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub company_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    /// 0 to 100
    pub overall_score: u32,
    pub sentiment_distribution: SentimentDistribution,
    pub summary: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub topics: Vec<TopicInsight>,
    pub reviews: Vec<ReviewSource>,
}

/// Percentage breakdown of reviews across the three sentiment categories.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SentimentDistribution {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

/// Aggregated sentiment for one discussed theme (pricing, support, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopicInsight {
    pub topic: String,
    /// 0 to 100
    pub sentiment_score: f64,
    /// Relative mention frequency, 1 to 10
    pub volume: f64,
    pub summary: String,
}

/// A quoted or paraphrased excerpt from one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReviewSource {
    pub platform: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub snippet: String,
    pub sentiment: Sentiment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Categorical tone of a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    /// Read a 0 to 100 score as a tone: above 60 positive, below 40
    /// negative, neutral otherwise.
    pub fn from_score(score: f64) -> Self {
        if score > POSITIVE_THRESHOLD {
            Sentiment::Positive
        } else if score < NEGATIVE_THRESHOLD {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TopicInsight {
    /// Tone of this topic; see [`Sentiment::from_score`].
    pub fn tone(&self) -> Sentiment {
        Sentiment::from_score(self.sentiment_score)
    }
}

impl SentimentDistribution {
    pub fn total(&self) -> f64 {
        self.positive + self.neutral + self.negative
    }
}

impl AnalysisResult {
    /// Number of reviews carrying the given sentiment.
    pub fn review_count(&self, sentiment: Sentiment) -> usize {
        self.reviews.iter().filter(|r| r.sentiment == sentiment).count()
    }
}
