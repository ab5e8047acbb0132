/// Chat transcript logging handler
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::error;
use tracing::info;
use tracing::warn;

use super::AppState;
use crate::api::error::ApiError;
use crate::api::types::StatusResponse;
use crate::api::types::SummaryRequest;
use crate::api::types::INVALID_BODY;
use crate::api::types::SUMMARY_SAVED;

/// POST /summary
pub async fn save_summary(
    State(state): State<AppState>,
    payload: Result<Json<SummaryRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| {
        warn!("Rejected /summary body: {}", e.body_text());
        ApiError::BadRequest(INVALID_BODY.to_string())
    })?;
    let entry = req.validate(&state.api_token)?;

    info!("POST /summary client={}", entry.client_id);

    if let Err(e) = state.chat_service.store().append_chat_log(&entry).await {
        error!("Failed to store chat log for client '{}': {:?}", entry.client_id, e);
        return Err(ApiError::Internal);
    }

    Ok(Json(StatusResponse::new(SUMMARY_SAVED)))
}
