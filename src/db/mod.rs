use crate::config::SecurityConfig;
use crate::models::{NewPhrase, Phrase};
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use crate::entities::activity_logs::Model as ActivityLog;
pub use repositories::user::{NewUser, User};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

/// File path of a `sqlite:` URL, or `None` for in-memory and other backends.
fn sqlite_file_path(db_url: &str) -> Option<&str> {
    let rest = db_url.strip_prefix("sqlite:")?;
    let rest = rest.strip_prefix("//").unwrap_or(rest);
    let path = rest.split('?').next().unwrap_or_default();

    if path.is_empty() || path.contains(":memory:") {
        None
    } else {
        Some(path)
    }
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if let Some(path_str) = sqlite_file_path(db_url) {
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn phrase_repo(&self) -> repositories::phrase::PhraseRepository {
        repositories::phrase::PhraseRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn logs_repo(&self) -> repositories::logs::LogRepository {
        repositories::logs::LogRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Phrases
    // ========================================================================

    pub async fn list_phrases(&self) -> Result<Vec<Phrase>> {
        self.phrase_repo().list_all().await
    }

    pub async fn get_phrase(&self, id: i32) -> Result<Option<Phrase>> {
        self.phrase_repo().get(id).await
    }

    pub async fn list_phrase_contents(&self) -> Result<Vec<(i32, String)>> {
        self.phrase_repo().list_contents().await
    }

    pub async fn add_phrase(&self, phrase: &NewPhrase) -> Result<Phrase> {
        self.phrase_repo().insert(phrase).await
    }

    pub async fn update_phrase(&self, id: i32, phrase: &NewPhrase) -> Result<Option<Phrase>> {
        self.phrase_repo().update(id, phrase).await
    }

    pub async fn remove_phrase(&self, id: i32) -> Result<bool> {
        self.phrase_repo().delete(id).await
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repo().list().await
    }

    pub async fn count_users(&self) -> Result<u64> {
        self.user_repo().count().await
    }

    pub async fn create_user(&self, user: &NewUser<'_>, config: &SecurityConfig) -> Result<User> {
        self.user_repo().create(user, config).await
    }

    pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<Option<User>> {
        self.user_repo().verify_credentials(username, password).await
    }

    pub async fn update_password(
        &self,
        username: &str,
        new_password: &str,
        must_change_password: bool,
        config: &SecurityConfig,
    ) -> Result<User> {
        self.user_repo()
            .update_password(username, new_password, must_change_password, config)
            .await
    }

    pub async fn set_user_admin(&self, id: i32, is_admin: bool) -> Result<Option<User>> {
        self.user_repo().set_admin(id, is_admin).await
    }

    pub async fn remove_user(&self, id: i32) -> Result<bool> {
        self.user_repo().delete(id).await
    }

    /// Creates the configured admin account when no user exists yet.
    /// Returns whether an account was created.
    pub async fn ensure_bootstrap_admin(&self, config: &SecurityConfig) -> Result<bool> {
        if self.count_users().await? > 0 {
            return Ok(false);
        }

        let admin = NewUser {
            username: &config.bootstrap_admin_username,
            password: &config.bootstrap_admin_password,
            is_admin: true,
            must_change_password: true,
        };
        self.create_user(&admin, config).await?;

        info!(
            username = %config.bootstrap_admin_username,
            "Created bootstrap admin account (password change required)"
        );
        Ok(true)
    }

    // ========================================================================
    // Activity log
    // ========================================================================

    pub async fn add_log(&self, username: &str, action: &str, detail: Option<String>) -> Result<()> {
        self.logs_repo().add(username, action, detail).await
    }

    pub async fn recent_logs(
        &self,
        limit: u64,
        username_filter: Option<String>,
        action_filter: Option<String>,
    ) -> Result<Vec<ActivityLog>> {
        self.logs_repo()
            .recent(limit, username_filter, action_filter)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_file_path() {
        assert_eq!(sqlite_file_path("sqlite:data/frases.db"), Some("data/frases.db"));
        assert_eq!(
            sqlite_file_path("sqlite:///tmp/x.db?mode=rwc"),
            Some("/tmp/x.db")
        );
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
        assert_eq!(sqlite_file_path("postgres://localhost/frases"), None);
    }

    #[tokio::test]
    async fn test_store_round_trip() {
        let dir = std::env::temp_dir().join(format!("frases-store-{}", uuid::Uuid::new_v4()));
        let url = format!("sqlite:{}", dir.join("test.db").display());
        let store = Store::with_pool_options(&url, 1, 1).await.unwrap();
        store.ping().await.unwrap();

        let phrase = store
            .add_phrase(&NewPhrase {
                company: "Acme".to_string(),
                document_type: "Carta".to_string(),
                reason: "Atraso".to_string(),
                content: "Reenvie o documento.".to_string(),
                reviewed_by: Some("ana".to_string()),
                review_date: chrono::NaiveDate::from_ymd_opt(2025, 1, 2),
            })
            .await
            .unwrap();

        let loaded = store.get_phrase(phrase.id).await.unwrap().unwrap();
        assert_eq!(loaded.review_date, chrono::NaiveDate::from_ymd_opt(2025, 1, 2));
        assert_eq!(store.list_phrases().await.unwrap().len(), 1);
        assert!(store.remove_phrase(phrase.id).await.unwrap());
        assert!(!store.remove_phrase(phrase.id).await.unwrap());

        let config = SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            ..SecurityConfig::default()
        };
        assert!(store.ensure_bootstrap_admin(&config).await.unwrap());
        assert!(!store.ensure_bootstrap_admin(&config).await.unwrap());

        let admin = store.verify_credentials("admin", "admin").await.unwrap().unwrap();
        assert!(admin.is_admin);
        assert!(admin.must_change_password);
        assert!(store.verify_credentials("admin", "nope").await.unwrap().is_none());

        store.add_log("admin", "login", None).await.unwrap();
        let logs = store.recent_logs(10, None, Some("log".into())).await.unwrap();
        assert_eq!(logs.len(), 1);

        let _ = std::fs::remove_dir_all(dir);
    }
}
