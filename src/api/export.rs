use axum::{
    Extension,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{ApiError, AppState};
use crate::services::activity;
use crate::services::export::{backup_filename, phrases_to_csv};

/// GET /phrases/export
/// Full table as a CSV attachment.
pub async fn export_phrases(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Response, ApiError> {
    let phrases = state.phrase_service().list().await?;
    let content = phrases_to_csv(&phrases)?;

    let filename = backup_filename(chrono::Local::now().date_naive());
    state
        .shared
        .activity
        .record(
            &user.username,
            activity::EXPORT,
            Some(format!("{} phrases", phrases.len())),
        )
        .await;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        content,
    )
        .into_response())
}
