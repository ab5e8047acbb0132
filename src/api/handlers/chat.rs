/// Chat handler
use std::net::SocketAddr;

use axum::extract::rejection::JsonRejection;
use axum::extract::ConnectInfo;
use axum::extract::State;
use axum::Json;
use tracing::error;
use tracing::info;
use tracing::warn;

use super::AppState;
use crate::api::error::ApiError;
use crate::api::types::ChatRequest;
use crate::api::types::ChatResponse;
use crate::api::types::EMPTY_QUESTION_REPLY;
use crate::api::types::GENERIC_FAILURE_REPLY;
use crate::api::types::INVALID_BODY;

/// POST /chat
///
/// Checks run in order: token, client_id, rate limit, question. Upstream
/// failures are logged and answered with a generic apology, not a 5xx.
pub async fn chat(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| {
        warn!("Rejected /chat body: {}", e.body_text());
        ApiError::BadRequest(INVALID_BODY.to_string())
    })?;

    let valid = req.validate(&state.api_token)?;

    let caller = connect_info.map_or_else(
        || "unknown".to_string(),
        |ConnectInfo(addr)| addr.ip().to_string(),
    );
    if state.rate_limiter.is_rate_limited(&caller) {
        warn!("Rate limit exceeded for {}", caller);
        return Err(ApiError::TooManyRequests);
    }

    if valid.question.is_empty() {
        return Ok(Json(ChatResponse {
            answer: EMPTY_QUESTION_REPLY.to_string(),
        }));
    }

    info!("POST /chat client={} caller={}", valid.client_id, caller);

    let answer = match state
        .chat_service
        .answer(&valid.client_id, &valid.question)
        .await
    {
        Ok(outcome) => outcome.answer,
        Err(e) => {
            error!("Chat failed for client '{}': {:?}", valid.client_id, e);
            GENERIC_FAILURE_REPLY.to_string()
        }
    };

    Ok(Json(ChatResponse { answer }))
}
