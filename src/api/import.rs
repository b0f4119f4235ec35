use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{ApiError, ApiResponse, AppState};
use crate::import::ImportFormat;
use crate::services::ImportSummary;

#[derive(Debug, Deserialize)]
pub struct ImportQuery {
    #[serde(default)]
    pub format: ImportFormat,
    #[serde(default)]
    pub dry_run: bool,
}

/// POST /phrases/import?format=csv|xlsx&dry_run=true
/// The request body is the raw file.
pub async fn import_phrases(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ImportQuery>,
    body: Bytes,
) -> Result<Json<ApiResponse<ImportSummary>>, ApiError> {
    if body.is_empty() {
        return Err(ApiError::validation("Request body is empty"));
    }

    let summary = state
        .import_service()
        .import(&user.username, &body, query.format, query.dry_run)
        .await?;

    Ok(Json(ApiResponse::success(summary)))
}
