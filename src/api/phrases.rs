use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::validate_id;
use super::{ApiError, ApiResponse, AppState, MessageResponse};
use crate::models::Phrase;
use crate::search::SearchFilter;
use crate::services::{PhraseInput, PhraseSearch};

/// GET /phrases?q=&company=&document_type=
pub async fn search_phrases(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<SearchFilter>,
) -> Result<Json<ApiResponse<PhraseSearch>>, ApiError> {
    let outcome = state.phrase_service().search(&filter).await?;
    Ok(Json(ApiResponse::success(outcome)))
}

/// GET /phrases/{id}
pub async fn get_phrase(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Phrase>>, ApiError> {
    let id = validate_id("Phrase", id)?;
    let phrase = state.phrase_service().get(id).await?;
    Ok(Json(ApiResponse::success(phrase)))
}

/// POST /phrases
pub async fn create_phrase(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<PhraseInput>,
) -> Result<(StatusCode, Json<ApiResponse<Phrase>>), ApiError> {
    let phrase = state
        .phrase_service()
        .create(&user.username, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(phrase))))
}

/// PUT /phrases/{id}
pub async fn update_phrase(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<PhraseInput>,
) -> Result<Json<ApiResponse<Phrase>>, ApiError> {
    let id = validate_id("Phrase", id)?;
    let phrase = state
        .phrase_service()
        .update(&user.username, id, payload)
        .await?;
    Ok(Json(ApiResponse::success(phrase)))
}

/// DELETE /phrases/{id} (admin)
pub async fn delete_phrase(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    user.require_admin()?;
    let id = validate_id("Phrase", id)?;

    state.phrase_service().delete(&user.username, id).await?;
    Ok(Json(ApiResponse::success(MessageResponse::new(format!(
        "Phrase {id} deleted"
    )))))
}
