use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::auth::{AdminUserStore, Authorizer, LengthTokenAuthorizer, PgAdminUserStore};
use crate::config::AppConfig;
use crate::memory::MemoryStore;
use crate::products::{PgProductStore, ProductStore};
use crate::settings::{PgSettingStore, SettingStore};

/// Everything a handler needs, passed in explicitly.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub admins: Arc<dyn AdminUserStore>,
    pub settings: Arc<dyn SettingStore>,
    pub products: Arc<dyn ProductStore>,
    pub authorizer: Arc<dyn Authorizer>,
}

impl AppState {
    /// Connect to Postgres, apply migrations and wire the Postgres stores.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
            tracing::warn!(error = %e, "migration failed; continuing");
        }

        Ok(Self::from_pool(db, Arc::new(config)))
    }

    pub fn from_pool(db: PgPool, config: Arc<AppConfig>) -> Self {
        Self {
            config,
            admins: Arc::new(PgAdminUserStore::new(db.clone())),
            settings: Arc::new(PgSettingStore::new(db.clone())),
            products: Arc::new(PgProductStore::new(db)),
            authorizer: Arc::new(LengthTokenAuthorizer),
        }
    }

    /// State backed by a fresh [`MemoryStore`], returned alongside it so
    /// callers can seed settings.
    pub fn in_memory() -> (Self, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());
        let config = Arc::new(AppConfig {
            database_url: "memory://".into(),
            host: "127.0.0.1".into(),
            port: 0,
            max_connections: 1,
        });
        let state = Self {
            config,
            admins: store.clone(),
            settings: store.clone(),
            products: store.clone(),
            authorizer: Arc::new(LengthTokenAuthorizer),
        };
        (state, store)
    }

    pub fn with_authorizer(mut self, authorizer: Arc<dyn Authorizer>) -> Self {
        self.authorizer = authorizer;
        self
    }
}
