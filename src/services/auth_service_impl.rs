//! `SeaORM` implementation of the `AuthService` trait.

use crate::config::SecurityConfig;
use crate::db::repositories::user::generate_temporary_password;
use crate::db::{NewUser, Store};
use crate::services::activity::{self, ActivityLog};
use crate::services::auth_service::{AuthError, AuthService, PasswordChange, UserInfo};
use async_trait::async_trait;
use tracing::info;

const MAX_USERNAME_LENGTH: usize = 64;

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
    activity: ActivityLog,
}

impl SeaOrmAuthService {
    #[must_use]
    pub fn new(store: Store, security: SecurityConfig) -> Self {
        let activity = ActivityLog::new(store.clone());
        Self {
            store,
            security,
            activity,
        }
    }

    fn validate_new_password(&self, password: &str) -> Result<(), AuthError> {
        let min = self.security.min_password_length;
        if password.chars().count() < min {
            return Err(AuthError::Validation(format!(
                "Password must be at least {min} characters"
            )));
        }
        Ok(())
    }

    fn validate_username(username: &str) -> Result<&str, AuthError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AuthError::Validation("Username cannot be empty".to_string()));
        }
        if username.chars().count() > MAX_USERNAME_LENGTH {
            return Err(AuthError::Validation(format!(
                "Username cannot exceed {MAX_USERNAME_LENGTH} characters"
            )));
        }
        if username.chars().any(char::is_whitespace) {
            return Err(AuthError::Validation(
                "Username cannot contain spaces".to_string(),
            ));
        }
        Ok(username)
    }

    async fn find_target(&self, id: i32) -> Result<crate::db::User, AuthError> {
        self.store.get_user(id).await?.ok_or(AuthError::UserNotFound)
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, username: &str, password: &str) -> Result<UserInfo, AuthError> {
        let Some(user) = self.store.verify_credentials(username, password).await? else {
            self.activity
                .record(username, activity::LOGIN_FAILED, None)
                .await;
            return Err(AuthError::InvalidCredentials);
        };

        self.activity.record(&user.username, activity::LOGIN, None).await;
        Ok(user.into())
    }

    async fn get_user_info(&self, username: &str) -> Result<UserInfo, AuthError> {
        let user = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(user.into())
    }

    async fn change_password(
        &self,
        username: &str,
        change: PasswordChange<'_>,
    ) -> Result<UserInfo, AuthError> {
        let user = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if change.new_password != change.confirm_password {
            return Err(AuthError::Validation(
                "Password confirmation does not match".to_string(),
            ));
        }
        self.validate_new_password(change.new_password)?;

        if !user.must_change_password {
            let current = change
                .current_password
                .filter(|p| !p.is_empty())
                .ok_or_else(|| {
                    AuthError::Validation("Current password is required".to_string())
                })?;

            if self
                .store
                .verify_credentials(username, current)
                .await?
                .is_none()
            {
                return Err(AuthError::Validation(
                    "Current password is incorrect".to_string(),
                ));
            }
        }

        // Compared against the stored hash, so it also covers the forced change
        if self
            .store
            .verify_credentials(username, change.new_password)
            .await?
            .is_some()
        {
            return Err(AuthError::Validation(
                "New password must be different from current password".to_string(),
            ));
        }

        let updated = self
            .store
            .update_password(username, change.new_password, false, &self.security)
            .await?;

        let detail = user.must_change_password.then(|| "forced".to_string());
        self.activity
            .record(username, activity::PASSWORD_CHANGED, detail)
            .await;

        Ok(updated.into())
    }

    async fn list_users(&self) -> Result<Vec<UserInfo>, AuthError> {
        let users = self.store.list_users().await?;
        Ok(users.into_iter().map(UserInfo::from).collect())
    }

    async fn create_user(
        &self,
        actor: &str,
        username: &str,
        password: &str,
        is_admin: bool,
    ) -> Result<UserInfo, AuthError> {
        let username = Self::validate_username(username)?;
        self.validate_new_password(password)?;

        if self.store.get_user_by_username(username).await?.is_some() {
            return Err(AuthError::UsernameTaken(username.to_string()));
        }

        let user = self
            .store
            .create_user(
                &NewUser {
                    username,
                    password,
                    is_admin,
                    must_change_password: true,
                },
                &self.security,
            )
            .await?;

        info!(username, is_admin, created_by = actor, "User created");
        self.activity
            .record(actor, activity::USER_CREATED, Some(username.to_string()))
            .await;

        Ok(user.into())
    }

    async fn delete_user(&self, actor: &str, id: i32) -> Result<(), AuthError> {
        let target = self.find_target(id).await?;
        if target.username == actor {
            return Err(AuthError::SelfDeletion);
        }

        if !self.store.remove_user(id).await? {
            return Err(AuthError::UserNotFound);
        }

        info!(username = %target.username, deleted_by = actor, "User deleted");
        self.activity
            .record(actor, activity::USER_DELETED, Some(target.username))
            .await;
        Ok(())
    }

    async fn set_admin(
        &self,
        actor: &str,
        id: i32,
        is_admin: bool,
    ) -> Result<UserInfo, AuthError> {
        let target = self.find_target(id).await?;
        if target.username == actor && !is_admin {
            return Err(AuthError::Validation(
                "You cannot remove your own admin role".to_string(),
            ));
        }

        let user = self
            .store
            .set_user_admin(id, is_admin)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        self.activity
            .record(
                actor,
                activity::USER_ROLE_CHANGED,
                Some(format!("{} admin={is_admin}", user.username)),
            )
            .await;

        Ok(user.into())
    }

    async fn reset_password(&self, actor: &str, id: i32) -> Result<String, AuthError> {
        let target = self.find_target(id).await?;
        let temporary = generate_temporary_password();

        self.store
            .update_password(&target.username, &temporary, true, &self.security)
            .await?;

        self.activity
            .record(actor, activity::PASSWORD_RESET, Some(target.username))
            .await;

        Ok(temporary)
    }
}
