//! ReviewRadar Core Library
//!
//! The analysis result contract, the provider boundary and the query
//! controller that drives the idle/loading/success/error lifecycle.

pub mod analysis;
pub mod config;
pub mod error;
pub mod provider;
pub mod search;

pub use analysis::model::{
    AnalysisResult, ReviewSource, Sentiment, SentimentDistribution, TopicInsight,
};
pub use error::{RadarError, RadarResult};
pub use search::{
    QueryController, SearchPhase, SearchState, StalePolicy, SubmitOutcome, FAILURE_MESSAGE,
};
