//! Search route handlers.

use axum::{extract::State, http::StatusCode, Json};
use radar_core::analysis::{analysis_schema, RootSchema};
use radar_core::SearchState;
use serde::Deserialize;

use crate::state::AppState;

#[derive(Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

/// POST /api/search - Start a query; progress is observed via /ws or /api/state.
pub async fn submit_search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<(StatusCode, Json<SearchState>), (StatusCode, String)> {
    if req.query.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "query must not be empty".to_string()));
    }

    // Detached: the outcome lands in the shared state. The task may already
    // have resolved, so answer with the snapshot `spawn_query` published.
    drop(state.controller.spawn_query(req.query));

    Ok((StatusCode::ACCEPTED, Json(SearchState::loading())))
}

/// GET /api/state - Current search state.
pub async fn get_state(State(state): State<AppState>) -> Json<SearchState> {
    Json(state.controller.state())
}

/// GET /api/schema - JSON Schema of the analysis result.
pub async fn get_schema() -> Json<RootSchema> {
    Json(analysis_schema())
}
