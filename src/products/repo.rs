use async_trait::async_trait;
use sqlx::PgPool;

use crate::errors::RepositoryError;
use crate::products::repo_types::{Product, ProductFields};

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products, active or not, popular first then cheapest first.
    async fn list(&self) -> Result<Vec<Product>, RepositoryError>;

    async fn create(&self, fields: &ProductFields) -> Result<i32, RepositoryError>;

    /// Overwrite every mutable column. Returns rows touched.
    async fn update(&self, id: i32, fields: &ProductFields) -> Result<u64, RepositoryError>;

    /// Soft delete: clears `is_active`, keeps the row. Returns rows touched.
    async fn deactivate(&self, id: i32) -> Result<u64, RepositoryError>;
}

#[derive(Clone)]
pub struct PgProductStore {
    db: PgPool,
}

impl PgProductStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, duration, features, badge,
                   is_popular, is_active, updated_at
            FROM products
            ORDER BY is_popular DESC, price ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn create(&self, fields: &ProductFields) -> Result<i32, RepositoryError> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO products (name, price, duration, features, badge, is_popular, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&fields.name)
        .bind(fields.price)
        .bind(&fields.duration)
        .bind(&fields.features)
        .bind(&fields.badge)
        .bind(fields.is_popular)
        .bind(fields.is_active)
        .fetch_one(&self.db)
        .await?;
        Ok(id)
    }

    async fn update(&self, id: i32, fields: &ProductFields) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE products
               SET name = $1, price = $2, duration = $3, features = $4,
                   badge = $5, is_popular = $6, is_active = $7,
                   updated_at = CURRENT_TIMESTAMP
             WHERE id = $8
            "#,
        )
        .bind(&fields.name)
        .bind(fields.price)
        .bind(&fields.duration)
        .bind(&fields.features)
        .bind(&fields.badge)
        .bind(fields.is_popular)
        .bind(fields.is_active)
        .bind(id)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected())
    }

    async fn deactivate(&self, id: i32) -> Result<u64, RepositoryError> {
        let result = sqlx::query("UPDATE products SET is_active = false WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected())
    }
}
