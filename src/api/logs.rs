use axum::{
    Extension, Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::{DEFAULT_LOG_LIMIT, validate_limit};
use super::{ApiError, ApiResponse, AppState};
use crate::db::ActivityLog;

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    pub limit: Option<u64>,
    pub username: Option<String>,
    pub action: Option<String>,
}

/// GET /logs
/// Most recent activity first.
pub async fn get_logs(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<ApiResponse<Vec<ActivityLog>>>, ApiError> {
    user.require_admin()?;
    let limit = validate_limit(query.limit.unwrap_or(DEFAULT_LOG_LIMIT))?;

    let logs = state
        .store()
        .recent_logs(
            limit,
            query.username.filter(|u| !u.trim().is_empty()),
            query.action.filter(|a| !a.trim().is_empty()),
        )
        .await
        .map_err(|e| ApiError::ServiceUnavailable(e.to_string()))?;

    Ok(Json(ApiResponse::success(logs)))
}
