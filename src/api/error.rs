use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::import::ImportError;
use crate::services::{AuthError, PhraseError};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    ValidationError(String),

    Conflict(String),

    Unauthorized(String),

    Forbidden(String),

    /// The store could not be reached or failed mid-operation.
    ServiceUnavailable(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::ValidationError(msg) => write!(f, "Validation error: {msg}"),
            Self::Conflict(msg) => write!(f, "Conflict: {msg}"),
            Self::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            Self::Forbidden(msg) => write!(f, "Forbidden: {msg}"),
            Self::ServiceUnavailable(msg) => write!(f, "Service unavailable: {msg}"),
            Self::InternalError(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            Self::ServiceUnavailable(msg) => {
                tracing::error!("Backend unavailable: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "The database is unavailable, try again later".to_string(),
                )
            }
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ApiResponse::<()>::error(error_message);
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::Unauthorized(err.to_string()),
            AuthError::UserNotFound => Self::NotFound(err.to_string()),
            AuthError::Validation(msg) => Self::validation(msg),
            AuthError::UsernameTaken(_) => Self::Conflict(err.to_string()),
            AuthError::SelfDeletion => Self::validation(err.to_string()),
            AuthError::Backend(msg) => Self::ServiceUnavailable(msg),
        }
    }
}

impl From<PhraseError> for ApiError {
    fn from(err: PhraseError) -> Self {
        match err {
            PhraseError::NotFound(id) => Self::not_found("Phrase", id),
            PhraseError::Validation(msg) => Self::validation(msg),
            PhraseError::DuplicateContent { .. } => Self::Conflict(err.to_string()),
            PhraseError::Backend(msg) => Self::ServiceUnavailable(msg),
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::MissingColumns(_)
            | ImportError::EmptyFile
            | ImportError::FileTooLarge { .. }
            | ImportError::UnreadableFile { .. } => Self::validation(err.to_string()),
            ImportError::Database(msg) => Self::ServiceUnavailable(msg),
        }
    }
}

impl ApiError {
    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        Self::NotFound(format!("{resource} {id} not found"))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn status_and_message(err: ApiError) -> (StatusCode, String) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, body["error"].as_str().unwrap_or_default().to_string())
    }

    #[tokio::test]
    async fn test_backend_failures_are_service_unavailable() {
        let errors = [
            ApiError::from(AuthError::Backend("connection refused".into())),
            ApiError::from(PhraseError::Backend("connection refused".into())),
            ApiError::from(ImportError::Database("connection refused".into())),
        ];

        for err in errors {
            let (status, message) = status_and_message(err).await;
            assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
            assert_eq!(message, "The database is unavailable, try again later");
        }
    }

    #[tokio::test]
    async fn test_invalid_credentials_is_unauthorized() {
        let (status, message) =
            status_and_message(ApiError::from(AuthError::InvalidCredentials)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message, "Invalid credentials");
    }

    #[tokio::test]
    async fn test_validation_and_conflict_statuses() {
        let (status, _) =
            status_and_message(ApiError::from(AuthError::Validation("short".into()))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = status_and_message(ApiError::from(PhraseError::DuplicateContent {
            existing_id: 3,
        }))
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, message) = status_and_message(ApiError::from(PhraseError::NotFound(9))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(message, "Phrase 9 not found");
    }
}
