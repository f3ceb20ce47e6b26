use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Product row. `price` maps to the `numeric(10, 2)` column.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub price: Decimal,
    pub duration: String,
    pub features: Vec<String>,
    pub badge: Option<String>,
    pub is_popular: bool,
    pub is_active: bool,
    pub updated_at: OffsetDateTime,
}

/// Every mutable column, as written by create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub price: Decimal,
    pub duration: String,
    pub features: Vec<String>,
    pub badge: Option<String>,
    pub is_popular: bool,
    pub is_active: bool,
}
