//! Router configuration and server setup.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::ApiConfig;
use crate::handlers;
use crate::state::AppState;

/// Creates the API router with all routes configured.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::status_page))
        .route("/api/health", get(handlers::health))
        .route("/api/sweep", post(handlers::run_sweep))
        .route("/webhook/notion", post(handlers::notion_webhook))
        .layer(cors)
        .with_state(state)
}

/// Starts the API server.
pub async fn serve(config: ApiConfig, state: AppState) -> Result<(), std::io::Error> {
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API server listening on {}", addr);
    axum::serve(listener, create_router(state)).await
}
