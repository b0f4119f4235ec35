//! Domain service for authentication and user management.
//!
//! Handles login, password changes (forced and voluntary) and the admin-only
//! account operations.

use serde::Serialize;
use thiserror::Error;

use crate::db::User;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown user or wrong password. The two are not distinguished.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),

    #[error("You cannot delete your own account")]
    SelfDeletion,

    #[error("Backend unavailable: {0}")]
    Backend(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Backend(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Backend(err.to_string())
    }
}

/// User info DTO for responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserInfo {
    pub id: i32,
    pub username: String,
    pub is_admin: bool,
    pub must_change_password: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            is_admin: user.is_admin,
            must_change_password: user.must_change_password,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// A password change request. `current_password` may be omitted only while a
/// forced change is pending.
#[derive(Debug, Clone, Copy)]
pub struct PasswordChange<'a> {
    pub current_password: Option<&'a str>,
    pub new_password: &'a str,
    pub confirm_password: &'a str,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials and returns user info.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(&self, username: &str, password: &str) -> Result<UserInfo, AuthError>;

    async fn get_user_info(&self, username: &str) -> Result<UserInfo, AuthError>;

    /// Changes a user's password and clears the forced-change flag.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] if the confirmation does not match,
    /// the password is too short or unchanged, or the current password is
    /// missing or wrong on a voluntary change.
    async fn change_password(
        &self,
        username: &str,
        change: PasswordChange<'_>,
    ) -> Result<UserInfo, AuthError>;

    async fn list_users(&self) -> Result<Vec<UserInfo>, AuthError>;

    /// Creates an account that must change its password on first login.
    async fn create_user(
        &self,
        actor: &str,
        username: &str,
        password: &str,
        is_admin: bool,
    ) -> Result<UserInfo, AuthError>;

    /// # Errors
    ///
    /// Returns [`AuthError::SelfDeletion`] when `actor` targets its own account.
    async fn delete_user(&self, actor: &str, id: i32) -> Result<(), AuthError>;

    async fn set_admin(&self, actor: &str, id: i32, is_admin: bool)
    -> Result<UserInfo, AuthError>;

    /// Replaces the password with a random temporary one, which is returned,
    /// and forces a change on next login.
    async fn reset_password(&self, actor: &str, id: i32) -> Result<String, AuthError>;
}
