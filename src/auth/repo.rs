use async_trait::async_trait;
use sqlx::PgPool;

use crate::auth::repo_types::AdminUser;
use crate::errors::RepositoryError;

/// Credential store for admin accounts.
#[async_trait]
pub trait AdminUserStore: Send + Sync {
    /// Find the admin whose username and password hash both match.
    async fn find_by_credentials(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<Option<AdminUser>, RepositoryError>;

    /// Insert a new admin and return its id.
    ///
    /// Returns `RepositoryError::Conflict` if the username is taken.
    async fn create(&self, username: &str, password_hash: &str) -> Result<i32, RepositoryError>;
}

#[derive(Clone)]
pub struct PgAdminUserStore {
    db: PgPool,
}

impl PgAdminUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AdminUserStore for PgAdminUserStore {
    async fn find_by_credentials(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<Option<AdminUser>, RepositoryError> {
        let user = sqlx::query_as::<_, AdminUser>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM admin_users
            WHERE username = $1 AND password_hash = $2
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create(&self, username: &str, password_hash: &str) -> Result<i32, RepositoryError> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO admin_users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                RepositoryError::Conflict("username already exists".to_owned())
            }
            other => RepositoryError::Database(other),
        })?;
        Ok(id)
    }
}
