use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Editable content page; `home` also carries the storefront theme
#[derive(Debug, Clone, FromRow)]
pub struct Page {
    pub slug: String,
    pub title: String,
    pub content: serde_json::Value,
    pub theme_template: Option<String>,
    pub theme_variables: serde_json::Value,
    pub theme_preset: serde_json::Value,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<i64>,
}
