//! API route definitions

use axum::routing::get;
use axum::routing::post;
use axum::Router;

use super::handlers::AppState;
use super::handlers::{
    self,
};

/// Create the JSON API router
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        // Liveness
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // Chat endpoints
        .route("/chat", post(handlers::chat))
        .route("/summary", post(handlers::save_summary))
        // Tenant config files for the embeddable widget
        .route("/configs/:file", get(handlers::get_config_file))
        .with_state(state)
}
