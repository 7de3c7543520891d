//! Search lifecycle state observed by renderers.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::analysis::model::AnalysisResult;

/// Snapshot of the query lifecycle.
///
/// After a completed request at most one of `error` and `data` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchState {
    pub is_loading: bool,
    pub error: Option<String>,
    pub data: Option<Arc<AnalysisResult>>,
}

/// The four lifecycle phases a renderer distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    Idle,
    Loading,
    Success,
    Error,
}

/// How one `submit_query` invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Success,
    Failure,
    /// A newer query was submitted before this one resolved; its result was
    /// discarded without touching the state.
    Superseded,
}

/// Which resolution wins when queries overlap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StalePolicy {
    /// Only the most recently submitted query may update the state.
    #[default]
    LatestWins,
    /// Whichever query resolves last overwrites the state.
    LastResolvedWins,
}

impl SearchState {
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            error: None,
            data: None,
        }
    }

    pub fn success(result: AnalysisResult) -> Self {
        Self {
            is_loading: false,
            error: None,
            data: Some(Arc::new(result)),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            is_loading: false,
            error: Some(message.into()),
            data: None,
        }
    }

    pub fn phase(&self) -> SearchPhase {
        if self.is_loading {
            SearchPhase::Loading
        } else if self.error.is_some() {
            SearchPhase::Error
        } else if self.data.is_some() {
            SearchPhase::Success
        } else {
            SearchPhase::Idle
        }
    }
}
