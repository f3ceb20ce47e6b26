//! In-memory stores, used when no database is wired in (tests, local runs).

use std::collections::BTreeMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::{
    auth::{repo::AdminUserStore, repo_types::AdminUser},
    errors::RepositoryError,
    products::{
        repo::ProductStore,
        repo_types::{Product, ProductFields},
    },
    settings::{repo::SettingStore, repo_types::SiteSetting},
};

#[derive(Default)]
struct Tables {
    admins: Vec<AdminUser>,
    settings: BTreeMap<String, SiteSetting>,
    products: Vec<Product>,
    next_admin_id: i32,
    next_product_id: i32,
}

/// One store backing all three tables.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Settings are never created through the API; this stands in for the
    /// external seeding.
    pub async fn seed_setting(&self, key: &str, value: &str, kind: &str) {
        let mut t = self.tables.write().await;
        t.settings.insert(
            key.to_string(),
            SiteSetting {
                setting_key: key.to_string(),
                setting_value: Some(value.to_string()),
                setting_type: kind.to_string(),
                updated_at: OffsetDateTime::now_utc(),
            },
        );
    }
}

#[async_trait]
impl AdminUserStore for MemoryStore {
    async fn find_by_credentials(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<Option<AdminUser>, RepositoryError> {
        let t = self.tables.read().await;
        Ok(t.admins
            .iter()
            .find(|a| a.username == username && a.password_hash == password_hash)
            .cloned())
    }

    async fn create(&self, username: &str, password_hash: &str) -> Result<i32, RepositoryError> {
        let mut t = self.tables.write().await;
        if t.admins.iter().any(|a| a.username == username) {
            return Err(RepositoryError::Conflict("username already exists".to_owned()));
        }
        t.next_admin_id += 1;
        let id = t.next_admin_id;
        t.admins.push(AdminUser {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        });
        Ok(id)
    }
}

#[async_trait]
impl SettingStore for MemoryStore {
    async fn list(&self) -> Result<Vec<SiteSetting>, RepositoryError> {
        let t = self.tables.read().await;
        Ok(t.settings.values().cloned().collect())
    }

    async fn update_value(&self, key: &str, value: Option<&str>) -> Result<u64, RepositoryError> {
        let mut t = self.tables.write().await;
        match t.settings.get_mut(key) {
            Some(setting) => {
                setting.setting_value = value.map(str::to_string);
                setting.updated_at = OffsetDateTime::now_utc();
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let t = self.tables.read().await;
        let mut rows = t.products.clone();
        rows.sort_by(|a, b| {
            b.is_popular
                .cmp(&a.is_popular)
                .then(a.price.cmp(&b.price))
        });
        Ok(rows)
    }

    async fn create(&self, fields: &ProductFields) -> Result<i32, RepositoryError> {
        let mut t = self.tables.write().await;
        t.next_product_id += 1;
        let id = t.next_product_id;
        t.products.push(Product {
            id,
            name: fields.name.clone(),
            price: fields.price,
            duration: fields.duration.clone(),
            features: fields.features.clone(),
            badge: fields.badge.clone(),
            is_popular: fields.is_popular,
            is_active: fields.is_active,
            updated_at: OffsetDateTime::now_utc(),
        });
        Ok(id)
    }

    async fn update(&self, id: i32, fields: &ProductFields) -> Result<u64, RepositoryError> {
        let mut t = self.tables.write().await;
        let Some(p) = t.products.iter_mut().find(|p| p.id == id) else {
            return Ok(0);
        };
        p.name = fields.name.clone();
        p.price = fields.price;
        p.duration = fields.duration.clone();
        p.features = fields.features.clone();
        p.badge = fields.badge.clone();
        p.is_popular = fields.is_popular;
        p.is_active = fields.is_active;
        p.updated_at = OffsetDateTime::now_utc();
        Ok(1)
    }

    async fn deactivate(&self, id: i32) -> Result<u64, RepositoryError> {
        let mut t = self.tables.write().await;
        let mut touched = 0;
        for p in t.products.iter_mut().filter(|p| p.id == id) {
            p.is_active = false;
            touched += 1;
        }
        Ok(touched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn fields(name: &str, price: i64, is_popular: bool) -> ProductFields {
        ProductFields {
            name: name.into(),
            price: Decimal::from(price),
            duration: "1 month".into(),
            features: vec![],
            badge: None,
            is_popular,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn product_listing_is_ordered_and_keeps_inactive() {
        let store = MemoryStore::default();
        let a = ProductStore::create(&store, &fields("a", 3, false)).await.unwrap();
        ProductStore::create(&store, &fields("b", 7, true)).await.unwrap();
        ProductStore::create(&store, &fields("c", 1, false)).await.unwrap();
        assert_eq!(store.deactivate(a).await.unwrap(), 1);

        let rows = ProductStore::list(&store).await.unwrap();
        let names: Vec<&str> = rows.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["b", "c", "a"]);
        assert!(!rows[2].is_active);
    }

    #[tokio::test]
    async fn missing_rows_report_zero_touched() {
        let store = MemoryStore::default();
        assert_eq!(store.deactivate(99).await.unwrap(), 0);
        assert_eq!(store.update(99, &fields("x", 1, false)).await.unwrap(), 0);
        assert_eq!(store.update_value("nope", Some("v")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn duplicate_admin_is_a_conflict() {
        let store = MemoryStore::default();
        AdminUserStore::create(&store, "root", "h1").await.unwrap();
        let err = AdminUserStore::create(&store, "root", "h2").await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }
}
