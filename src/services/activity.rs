//! Append-only activity log. Writes never fail the caller.

use crate::db::Store;
use tracing::warn;

pub const LOGIN: &str = "login";
pub const LOGIN_FAILED: &str = "login_failed";
pub const LOGOUT: &str = "logout";
pub const PASSWORD_CHANGED: &str = "password_changed";
pub const PHRASE_CREATED: &str = "phrase_created";
pub const PHRASE_UPDATED: &str = "phrase_updated";
pub const PHRASE_DELETED: &str = "phrase_deleted";
pub const IMPORT: &str = "import";
pub const EXPORT: &str = "export";
pub const USER_CREATED: &str = "user_created";
pub const USER_DELETED: &str = "user_deleted";
pub const USER_ROLE_CHANGED: &str = "user_role_changed";
pub const PASSWORD_RESET: &str = "password_reset";

#[derive(Clone)]
pub struct ActivityLog {
    store: Store,
}

impl ActivityLog {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn record(&self, username: &str, action: &str, detail: Option<String>) {
        if let Err(e) = self.store.add_log(username, action, detail).await {
            warn!(error = %e, username, action, "Failed to write activity log");
        }
    }
}
