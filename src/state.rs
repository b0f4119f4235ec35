use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    ActivityLog, AuthService, DefaultImportService, ImportService, PhraseService,
    SeaOrmAuthService, SeaOrmPhraseService,
};

/// Everything the HTTP API and the CLI share: configuration, the store and the
/// domain services built on top of it.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub activity: ActivityLog,

    pub auth_service: Arc<dyn AuthService>,

    pub phrase_service: Arc<dyn PhraseService>,

    pub import_service: Arc<dyn ImportService>,
}

impl SharedState {
    /// Connects to the database, applies migrations and seeds the bootstrap
    /// admin when there are no users.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_url,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;
        store.ensure_bootstrap_admin(&config.security).await?;

        Ok(Self::with_store(config, store))
    }

    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn AuthService>;

        let phrase_service = Arc::new(SeaOrmPhraseService::new(
            store.clone(),
            config.import.clone(),
        )) as Arc<dyn PhraseService>;

        let import_service = Arc::new(DefaultImportService::new(
            store.clone(),
            config.import.clone(),
        )) as Arc<dyn ImportService>;

        Self {
            config: Arc::new(config),
            activity: ActivityLog::new(store.clone()),
            store,
            auth_service,
            phrase_service,
            import_service,
        }
    }
}
