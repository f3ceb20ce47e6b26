use async_trait::async_trait;
use sqlx::PgPool;

use crate::errors::RepositoryError;
use crate::settings::repo_types::SiteSetting;

#[async_trait]
pub trait SettingStore: Send + Sync {
    async fn list(&self) -> Result<Vec<SiteSetting>, RepositoryError>;

    /// Set the value of one setting and bump its timestamp. Returns the
    /// number of rows touched, 0 for an unknown key.
    async fn update_value(&self, key: &str, value: Option<&str>) -> Result<u64, RepositoryError>;
}

#[derive(Clone)]
pub struct PgSettingStore {
    db: PgPool,
}

impl PgSettingStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SettingStore for PgSettingStore {
    async fn list(&self) -> Result<Vec<SiteSetting>, RepositoryError> {
        let rows = sqlx::query_as::<_, SiteSetting>(
            r#"
            SELECT setting_key, setting_value, setting_type, updated_at
            FROM site_settings
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn update_value(&self, key: &str, value: Option<&str>) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE site_settings
               SET setting_value = $1, updated_at = CURRENT_TIMESTAMP
             WHERE setting_key = $2
            "#,
        )
        .bind(value)
        .bind(key)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected())
    }
}
