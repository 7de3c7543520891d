//! ReviewRadar Web Server
//!
//! Axum-based web server for the dashboard, REST API and live state stream.

pub mod routes;
pub mod state;
pub mod websocket;

use axum::{
    routing::{get, post},
    Router,
};
use radar_core::QueryController;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/search", post(routes::search::submit_search))
        .route("/state", get(routes::search::get_state))
        .route("/schema", get(routes::search::get_schema))
        .with_state(state.clone());

    Router::new()
        .route("/", get(routes::dashboard::index))
        .nest("/api", api_routes)
        .route("/ws", get(websocket::ws_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Run the web server.
pub async fn run_server(controller: QueryController, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(controller);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    tracing::info!("Web server listening on http://{}:{}", host, port);

    axum::serve(listener, app).await?;
    Ok(())
}
