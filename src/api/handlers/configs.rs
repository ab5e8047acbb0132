/// Tenant config file handler
use axum::extract::Path;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use tracing::debug;

use super::AppState;
use crate::api::error::ApiError;

/// Client ids that are safe to turn into a file name
fn is_safe_client_id(client_id: &str) -> bool {
    !client_id.is_empty()
        && client_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// GET /configs/:file where `file` is `<client_id>.json`
pub async fn get_config_file(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let not_found = || ApiError::NotFound("Config not found".to_string());

    let client_id = file
        .strip_suffix(".json")
        .filter(|id| is_safe_client_id(id))
        .ok_or_else(not_found)?;

    let path = state.configs_dir.join(format!("{client_id}.json"));
    let body = tokio::fs::read(&path).await.map_err(|e| {
        debug!("Config file {} unavailable: {}", path.display(), e);
        not_found()
    })?;

    Ok(([(header::CONTENT_TYPE, "application/json")], body))
}
