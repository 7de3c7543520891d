//! Query controller.
//!
//! Owns the [`SearchState`] for one view and drives it through
//! idle → loading → success | error for each submitted query. Renderers
//! observe the state through a `watch` channel.

pub mod state;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::analysis::model::AnalysisResult;
use crate::error::RadarResult;
use crate::provider::AnalysisProvider;

pub use state::{SearchPhase, SearchState, StalePolicy, SubmitOutcome};

/// User-facing message for every analysis failure.
pub const FAILURE_MESSAGE: &str =
    "Failed to analyze. Please check the company name or try again later.";

/// Drives the request lifecycle against one analysis provider.
///
/// Cloning is cheap; clones share the same state and token counter.
#[derive(Clone)]
pub struct QueryController {
    inner: Arc<Inner>,
}

struct Inner {
    provider: Arc<dyn AnalysisProvider>,
    state: watch::Sender<SearchState>,
    /// Token of the most recently submitted query.
    latest: AtomicU64,
    policy: StalePolicy,
}

impl QueryController {
    pub fn new(provider: Arc<dyn AnalysisProvider>) -> Self {
        Self::with_policy(provider, StalePolicy::default())
    }

    pub fn with_policy(provider: Arc<dyn AnalysisProvider>, policy: StalePolicy) -> Self {
        let (state, _rx) = watch::channel(SearchState::default());
        Self {
            inner: Arc::new(Inner {
                provider,
                state,
                latest: AtomicU64::new(0),
                policy,
            }),
        }
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.inner.state.subscribe()
    }

    /// Current state snapshot.
    pub fn state(&self) -> SearchState {
        self.inner.state.borrow().clone()
    }

    pub fn policy(&self) -> StalePolicy {
        self.inner.policy
    }

    pub fn provider_name(&self) -> &str {
        self.inner.provider.name()
    }

    /// Run one query through the provider.
    ///
    /// The loading state is published before the provider is called. Every
    /// failure ends in the error state with [`FAILURE_MESSAGE`]; nothing
    /// propagates to the caller.
    ///
    /// Dropping the future before it resolves publishes the error state, so
    /// a cancelled query never leaves the view loading.
    pub async fn submit_query(&self, query: &str) -> SubmitOutcome {
        let token = self.begin(query);
        self.run(token, query).await
    }

    /// Publish the loading state now and run the query on a spawned task.
    pub fn spawn_query(&self, query: impl Into<String>) -> JoinHandle<SubmitOutcome> {
        let query = query.into();
        let token = self.begin(&query);
        let controller = self.clone();
        tokio::spawn(async move { controller.run(token, &query).await })
    }

    async fn run(&self, token: u64, query: &str) -> SubmitOutcome {
        let mut pending = PendingQuery {
            controller: self,
            token,
            armed: true,
        };
        let result = self.inner.provider.analyze(query).await;
        pending.armed = false;
        self.resolve(token, result)
    }

    /// Issue the next token and publish the loading state.
    fn begin(&self, query: &str) -> u64 {
        let mut token = 0;
        self.inner.state.send_modify(|state| {
            token = self.inner.latest.fetch_add(1, Ordering::SeqCst) + 1;
            *state = SearchState::loading();
        });
        info!(
            query,
            token,
            provider = self.inner.provider.name(),
            "Submitting query"
        );
        token
    }

    fn resolve(&self, token: u64, result: RadarResult<AnalysisResult>) -> SubmitOutcome {
        let (next, outcome) = match result {
            Ok(analysis) => {
                info!(
                    token,
                    company = %analysis.company_name,
                    score = analysis.overall_score,
                    "Analysis complete"
                );
                (SearchState::success(analysis), SubmitOutcome::Success)
            }
            Err(e) => {
                warn!(token, error = %e, "Analysis failed");
                (SearchState::failure(FAILURE_MESSAGE), SubmitOutcome::Failure)
            }
        };

        // The token check runs under the channel lock so a query submitted
        // concurrently cannot slip between the check and the write.
        let policy = self.inner.policy;
        let applied = self.inner.state.send_if_modified(|state| {
            if policy == StalePolicy::LatestWins
                && self.inner.latest.load(Ordering::SeqCst) != token
            {
                return false;
            }
            *state = next;
            true
        });

        if applied {
            outcome
        } else {
            debug!(token, "Discarding superseded result");
            SubmitOutcome::Superseded
        }
    }

    /// Publish the error state for a query dropped before it resolved,
    /// unless a newer query has taken over the view.
    fn abandon(&self, token: u64) {
        let applied = self.inner.state.send_if_modified(|state| {
            if self.inner.latest.load(Ordering::SeqCst) != token {
                return false;
            }
            *state = SearchState::failure(FAILURE_MESSAGE);
            true
        });
        if applied {
            warn!(token, "Query cancelled before the provider answered");
        }
    }
}

/// Clears the loading state if a query future is dropped mid-flight.
struct PendingQuery<'a> {
    controller: &'a QueryController,
    token: u64,
    armed: bool,
}

impl Drop for PendingQuery<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.controller.abandon(self.token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::model::{ReviewSource, Sentiment, SentimentDistribution, TopicInsight};
    use crate::analysis::parse_analysis;
    use crate::error::RadarError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    enum Reply {
        Ready(RadarResult<AnalysisResult>),
        Gated(oneshot::Receiver<()>, RadarResult<AnalysisResult>),
        Raw(String),
    }

    /// Provider answering each query from a script, optionally waiting on a gate.
    struct ScriptedProvider {
        calls: AtomicUsize,
        replies: Mutex<HashMap<String, Reply>>,
    }

    impl ScriptedProvider {
        fn new(replies: Vec<(&str, Reply)>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                replies: Mutex::new(
                    replies
                        .into_iter()
                        .map(|(q, r)| (q.to_string(), r))
                        .collect(),
                ),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AnalysisProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn analyze(&self, query: &str) -> RadarResult<AnalysisResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let reply = self.replies.lock().unwrap().remove(query);
            match reply {
                Some(Reply::Ready(result)) => result,
                Some(Reply::Gated(gate, result)) => {
                    let _ = gate.await;
                    result
                }
                Some(Reply::Raw(text)) => parse_analysis(&text),
                None => Err(RadarError::provider(format!("unscripted query '{}'", query))),
            }
        }
    }

    fn analysis(company: &str, score: u32) -> AnalysisResult {
        AnalysisResult {
            company_name: company.to_string(),
            website_url: None,
            overall_score: score,
            sentiment_distribution: SentimentDistribution {
                positive: 60.0,
                neutral: 25.0,
                negative: 15.0,
            },
            summary: "Mostly positive".to_string(),
            pros: vec!["Fast support".to_string()],
            cons: vec!["Pricing".to_string()],
            topics: vec![TopicInsight {
                topic: "Pricing".to_string(),
                sentiment_score: 35.0,
                volume: 7.0,
                summary: "Many complaints".to_string(),
            }],
            reviews: vec![ReviewSource {
                platform: "Reddit".to_string(),
                url: None,
                snippet: "Great tool".to_string(),
                sentiment: Sentiment::Positive,
                date: None,
            }],
        }
    }

    fn network_failure() -> RadarError {
        RadarError::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        ))
    }

    #[tokio::test]
    async fn test_starts_idle() {
        let controller = QueryController::new(ScriptedProvider::new(vec![]));
        assert_eq!(controller.state(), SearchState::default());
        assert_eq!(controller.state().phase(), SearchPhase::Idle);
    }

    #[tokio::test]
    async fn test_success_stores_result() {
        let provider = ScriptedProvider::new(vec![(
            "Acme Corp",
            Reply::Ready(Ok(analysis("Acme Corp", 72))),
        )]);
        let controller = QueryController::new(provider.clone());

        let outcome = controller.submit_query("Acme Corp").await;

        assert_eq!(outcome, SubmitOutcome::Success);
        let state = controller.state();
        assert!(!state.is_loading);
        assert_eq!(state.error, None);
        assert_eq!(state.data.unwrap().overall_score, 72);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_provider_failure_sets_generic_error() {
        let provider = ScriptedProvider::new(vec![("Acme Corp", Reply::Ready(Err(network_failure())))]);
        let controller = QueryController::new(provider.clone());

        let outcome = controller.submit_query("Acme Corp").await;

        assert_eq!(outcome, SubmitOutcome::Failure);
        let state = controller.state();
        assert!(!state.is_loading);
        assert_eq!(state.error.as_deref(), Some(FAILURE_MESSAGE));
        assert!(state.data.is_none());
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_invalid_payload_is_a_failure_not_a_partial_success() {
        let payload = serde_json::json!({
            "companyName": "Acme Corp",
            "overallScore": 72,
            "sentimentDistribution": {"positive": 60, "neutral": 25, "negative": 15},
            "pros": [], "cons": [], "topics": [], "reviews": []
        });
        let provider = ScriptedProvider::new(vec![("Acme Corp", Reply::Raw(payload.to_string()))]);
        let controller = QueryController::new(provider);

        assert_eq!(controller.submit_query("Acme Corp").await, SubmitOutcome::Failure);
        let state = controller.state();
        assert_eq!(state.phase(), SearchPhase::Error);
        assert!(state.data.is_none());
    }

    #[tokio::test]
    async fn test_loading_clears_previous_result() {
        let (release, gate) = oneshot::channel();
        let provider = ScriptedProvider::new(vec![
            ("Acme Corp", Reply::Ready(Ok(analysis("Acme Corp", 72)))),
            ("Globex", Reply::Gated(gate, Err(network_failure()))),
        ]);
        let controller = QueryController::new(provider);
        controller.submit_query("Acme Corp").await;
        assert_eq!(controller.state().phase(), SearchPhase::Success);

        let pending = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit_query("Globex").await }
        });

        let mut rx = controller.subscribe();
        rx.wait_for(|s| s.is_loading).await.unwrap();
        assert_eq!(controller.state(), SearchState::loading());

        release.send(()).unwrap();
        assert_eq!(pending.await.unwrap(), SubmitOutcome::Failure);
        assert_eq!(controller.state().phase(), SearchPhase::Error);
    }

    #[tokio::test]
    async fn test_loading_clears_previous_error() {
        let (release, gate) = oneshot::channel();
        let provider = ScriptedProvider::new(vec![
            ("Bad", Reply::Ready(Err(network_failure()))),
            ("Acme Corp", Reply::Gated(gate, Ok(analysis("Acme Corp", 72)))),
        ]);
        let controller = QueryController::new(provider);
        controller.submit_query("Bad").await;

        let pending = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit_query("Acme Corp").await }
        });

        let mut rx = controller.subscribe();
        rx.wait_for(|s| s.is_loading).await.unwrap();
        assert_eq!(controller.state().error, None);

        release.send(()).unwrap();
        assert_eq!(pending.await.unwrap(), SubmitOutcome::Success);
        assert_eq!(controller.state().error, None);
    }

    #[tokio::test]
    async fn test_latest_wins_discards_stale_result() {
        let (release, gate) = oneshot::channel();
        let provider = ScriptedProvider::new(vec![
            ("Old Co", Reply::Gated(gate, Ok(analysis("Old Co", 10)))),
            ("New Co", Reply::Ready(Ok(analysis("New Co", 90)))),
        ]);
        let controller = QueryController::with_policy(provider, StalePolicy::LatestWins);

        let old = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit_query("Old Co").await }
        });
        controller.subscribe().wait_for(|s| s.is_loading).await.unwrap();

        assert_eq!(controller.submit_query("New Co").await, SubmitOutcome::Success);
        release.send(()).unwrap();
        assert_eq!(old.await.unwrap(), SubmitOutcome::Superseded);

        let state = controller.state();
        assert!(!state.is_loading);
        assert_eq!(state.data.unwrap().company_name, "New Co");
    }

    #[tokio::test]
    async fn test_stale_failure_keeps_newer_query_loading() {
        let (release_old, old_gate) = oneshot::channel();
        let (release_new, new_gate) = oneshot::channel();
        let provider = ScriptedProvider::new(vec![
            ("Old Co", Reply::Gated(old_gate, Err(network_failure()))),
            ("New Co", Reply::Gated(new_gate, Ok(analysis("New Co", 90)))),
        ]);
        let controller = QueryController::new(provider.clone());

        let old = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit_query("Old Co").await }
        });
        while provider.calls() < 1 {
            tokio::task::yield_now().await;
        }
        let newer = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit_query("New Co").await }
        });
        while provider.calls() < 2 {
            tokio::task::yield_now().await;
        }

        release_old.send(()).unwrap();
        assert_eq!(old.await.unwrap(), SubmitOutcome::Superseded);
        assert_eq!(controller.state(), SearchState::loading());

        release_new.send(()).unwrap();
        assert_eq!(newer.await.unwrap(), SubmitOutcome::Success);
        assert_eq!(controller.state().data.unwrap().company_name, "New Co");
    }

    #[tokio::test]
    async fn test_last_resolved_wins_lets_stale_result_through() {
        let (release, gate) = oneshot::channel();
        let provider = ScriptedProvider::new(vec![
            ("Old Co", Reply::Gated(gate, Ok(analysis("Old Co", 10)))),
            ("New Co", Reply::Ready(Ok(analysis("New Co", 90)))),
        ]);
        let controller = QueryController::with_policy(provider, StalePolicy::LastResolvedWins);

        let old = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit_query("Old Co").await }
        });
        controller.subscribe().wait_for(|s| s.is_loading).await.unwrap();

        controller.submit_query("New Co").await;
        release.send(()).unwrap();
        assert_eq!(old.await.unwrap(), SubmitOutcome::Success);

        assert_eq!(controller.state().data.unwrap().company_name, "Old Co");
    }

    #[tokio::test]
    async fn test_spawn_query_publishes_loading_before_returning() {
        let provider = ScriptedProvider::new(vec![("Acme Corp", Reply::Ready(Ok(analysis("Acme Corp", 72))))]);
        let controller = QueryController::new(provider.clone());

        let handle = controller.spawn_query("Acme Corp");
        assert_eq!(controller.state(), SearchState::loading());

        assert_eq!(handle.await.unwrap(), SubmitOutcome::Success);
        assert_eq!(controller.state().data.unwrap().company_name, "Acme Corp");
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_observers_see_loading_then_success() {
        let (release, gate) = oneshot::channel();
        let provider = ScriptedProvider::new(vec![(
            "Acme Corp",
            Reply::Gated(gate, Ok(analysis("Acme Corp", 72))),
        )]);
        let controller = QueryController::new(provider);
        let mut rx = controller.subscribe();

        let pending = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit_query("Acme Corp").await }
        });

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().phase(), SearchPhase::Loading);

        release.send(()).unwrap();
        rx.changed().await.unwrap();
        let seen = rx.borrow_and_update().clone();
        assert_eq!(seen.phase(), SearchPhase::Success);
        assert_eq!(seen.data.unwrap().company_name, "Acme Corp");

        assert_eq!(pending.await.unwrap(), SubmitOutcome::Success);
    }

    #[tokio::test]
    async fn test_cancelled_query_does_not_stay_loading() {
        let (_release, gate) = oneshot::channel();
        let provider = ScriptedProvider::new(vec![(
            "Acme Corp",
            Reply::Gated(gate, Ok(analysis("Acme Corp", 72))),
        )]);
        let controller = QueryController::new(provider.clone());

        let pending = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit_query("Acme Corp").await }
        });
        while provider.calls() < 1 {
            tokio::task::yield_now().await;
        }
        assert_eq!(controller.state(), SearchState::loading());

        pending.abort();
        assert!(pending.await.unwrap_err().is_cancelled());

        assert_eq!(controller.state(), SearchState::failure(FAILURE_MESSAGE));
    }

    #[tokio::test]
    async fn test_cancelled_stale_query_leaves_newer_query_alone() {
        let (_release_old, old_gate) = oneshot::channel();
        let (release_new, new_gate) = oneshot::channel();
        let provider = ScriptedProvider::new(vec![
            ("Old Co", Reply::Gated(old_gate, Ok(analysis("Old Co", 10)))),
            ("New Co", Reply::Gated(new_gate, Ok(analysis("New Co", 90)))),
        ]);
        let controller = QueryController::new(provider.clone());

        let old = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit_query("Old Co").await }
        });
        while provider.calls() < 1 {
            tokio::task::yield_now().await;
        }
        let newer = controller.spawn_query("New Co");

        old.abort();
        assert!(old.await.unwrap_err().is_cancelled());
        assert_eq!(controller.state(), SearchState::loading());

        release_new.send(()).unwrap();
        assert_eq!(newer.await.unwrap(), SubmitOutcome::Success);
        assert_eq!(controller.state().data.unwrap().company_name, "New Co");
    }
}
