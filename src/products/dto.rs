use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::products::repo_types::{Product, ProductFields};

pub const DEFAULT_DURATION: &str = "Навсегда";

fn default_duration() -> String {
    DEFAULT_DURATION.to_string()
}

fn default_true() -> bool {
    true
}

/// POST body. Only `name` and `price` are required.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub price: Decimal,
    #[serde(default = "default_duration")]
    pub duration: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub badge: Option<String>,
    #[serde(default)]
    pub is_popular: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// PUT body. Unlike create, `duration` and `features` have no defaults.
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: String,
    pub price: Decimal,
    pub duration: String,
    pub features: Vec<String>,
    #[serde(default)]
    pub badge: Option<String>,
    #[serde(default)]
    pub is_popular: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl From<CreateProductRequest> for ProductFields {
    fn from(r: CreateProductRequest) -> Self {
        Self {
            name: r.name,
            price: r.price,
            duration: r.duration,
            features: r.features,
            badge: r.badge,
            is_popular: r.is_popular,
            is_active: r.is_active,
        }
    }
}

impl From<UpdateProductRequest> for ProductFields {
    fn from(r: UpdateProductRequest) -> Self {
        Self {
            name: r.name,
            price: r.price,
            duration: r.duration,
            features: r.features,
            badge: r.badge,
            is_popular: r.is_popular,
            is_active: r.is_active,
        }
    }
}

/// Public listing entry. `price` serializes as a JSON number.
#[derive(Debug, Serialize)]
pub struct ProductItem {
    pub id: i32,
    pub name: String,
    pub price: Decimal,
    pub duration: String,
    pub features: Vec<String>,
    pub badge: Option<String>,
    pub is_popular: bool,
    pub is_active: bool,
}

impl From<Product> for ProductItem {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            price: p.price,
            duration: p.duration,
            features: p.features,
            badge: p.badge,
            is_popular: p.is_popular,
            is_active: p.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedProductResponse {
    pub success: bool,
    pub id: i32,
}
