use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::validate_id;
use super::{ApiError, ApiResponse, AppState, MessageResponse};
use crate::services::UserInfo;

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Deserialize)]
pub struct SetAdminRequest {
    pub is_admin: bool,
}

#[derive(Serialize)]
pub struct ResetPasswordResponse {
    pub temporary_password: String,
}

/// GET /users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<UserInfo>>>, ApiError> {
    user.require_admin()?;
    let users = state.auth_service().list_users().await?;
    Ok(Json(ApiResponse::success(users)))
}

/// POST /users
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserInfo>>), ApiError> {
    user.require_admin()?;
    let created = state
        .auth_service()
        .create_user(
            &user.username,
            &payload.username,
            &payload.password,
            payload.is_admin,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    user.require_admin()?;
    let id = validate_id("User", id)?;

    state.auth_service().delete_user(&user.username, id).await?;
    Ok(Json(ApiResponse::success(MessageResponse::new(format!(
        "User {id} deleted"
    )))))
}

/// PUT /users/{id}/admin
pub async fn set_admin(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<SetAdminRequest>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    user.require_admin()?;
    let id = validate_id("User", id)?;

    let updated = state
        .auth_service()
        .set_admin(&user.username, id, payload.is_admin)
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}

/// POST /users/{id}/reset-password
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ResetPasswordResponse>>, ApiError> {
    user.require_admin()?;
    let id = validate_id("User", id)?;

    let temporary_password = state
        .auth_service()
        .reset_password(&user.username, id)
        .await?;
    Ok(Json(ApiResponse::success(ResetPasswordResponse {
        temporary_password,
    })))
}
