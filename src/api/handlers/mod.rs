/// API request handlers
use std::path::PathBuf;
use std::sync::Arc;

use axum::Json;

use crate::api::types::StatusResponse;
use crate::rag::ChatService;
use crate::rate_limit::RateLimiter;

// Re-export sub-modules
pub mod chat;
pub mod configs;
pub mod summary;

// Re-export handlers
pub use chat::*;
pub use configs::*;
pub use summary::*;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ChatService>,
    pub rate_limiter: Arc<RateLimiter>,
    pub api_token: Arc<str>,
    /// Directory of `<client_id>.json` files served by `/configs`
    pub configs_dir: PathBuf,
}

/// Root liveness handler
pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse::new("247Chatbot backend running"))
}

/// Health check handler
pub async fn health() -> Json<StatusResponse> {
    Json(StatusResponse::new("ok"))
}
