use axum::{
    Extension, Json,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::validation::validate_credentials_present;
use super::{ApiError, ApiResponse, AppState, MessageResponse};
use crate::services::{AuthError, PasswordChange, UserInfo, activity};

const SESSION_USER_KEY: &str = "user";

/// Paths reachable while a forced password change is pending.
const PASSWORD_CHANGE_ALLOWED: &[&str] = &["/auth/me", "/auth/password"];

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: Option<String>,
    pub new_password: String,
    pub confirm_password: String,
}

/// The logged-in user, inserted into request extensions by [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i32,
    pub username: String,
    pub is_admin: bool,
    pub must_change_password: bool,
}

impl CurrentUser {
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(ApiError::forbidden("Administrator access required"))
        }
    }
}

impl From<UserInfo> for CurrentUser {
    fn from(user: UserInfo) -> Self {
        Self {
            id: user.id,
            username: user.username,
            is_admin: user.is_admin,
            must_change_password: user.must_change_password,
        }
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Resolves the session cookie to a [`CurrentUser`].
///
/// Answers 401 without a valid session and 403 for every route except the
/// password change endpoints while `must_change_password` is set.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let username = get_session_username(&session).await?;

    let user = match state.auth_service().get_user_info(&username).await {
        Ok(user) => CurrentUser::from(user),
        Err(AuthError::UserNotFound) => {
            // Account deleted while logged in
            let _ = session.flush().await;
            return Err(ApiError::Unauthorized("Not authenticated".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::Span::current().record("user_id", user.username.as_str());

    if user.must_change_password {
        let path = request.uri().path();
        if !PASSWORD_CHANGE_ALLOWED.iter().any(|p| path.ends_with(p)) {
            return Err(ApiError::forbidden(
                "Password change required before continuing",
            ));
        }
    }

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    validate_credentials_present(&payload.username, &payload.password)?;

    let user = state
        .auth_service()
        .login(&payload.username, &payload.password)
        .await?;

    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to rotate session: {e}")))?;
    session
        .insert(SESSION_USER_KEY, &user.username)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    tracing::info!(username = %user.username, "User logged in");
    Ok(Json(ApiResponse::success(user)))
}

/// POST /auth/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Json<ApiResponse<MessageResponse>> {
    if let Ok(Some(username)) = session.get::<String>(SESSION_USER_KEY).await {
        state
            .shared
            .activity
            .record(&username, activity::LOGOUT, None)
            .await;
    }
    let _ = session.flush().await;

    Json(ApiResponse::success(MessageResponse::new("Logged out")))
}

/// GET /auth/me
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let info = state.auth_service().get_user_info(&user.username).await?;
    Ok(Json(ApiResponse::success(info)))
}

/// PUT /auth/password
/// The current password is only required when no forced change is pending.
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let info = state
        .auth_service()
        .change_password(
            &user.username,
            PasswordChange {
                current_password: payload.current_password.as_deref(),
                new_password: &payload.new_password,
                confirm_password: &payload.confirm_password,
            },
        )
        .await?;

    tracing::info!("Password changed for user: {}", user.username);
    Ok(Json(ApiResponse::success(info)))
}

// ============================================================================
// Helpers
// ============================================================================

async fn get_session_username(session: &Session) -> Result<String, ApiError> {
    session
        .get::<String>(SESSION_USER_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))
}
