use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SiteSetting {
    pub setting_key: String,
    pub setting_value: Option<String>,
    pub setting_type: String,
    pub updated_at: OffsetDateTime,
}
