use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "discount_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    /// `value` percent of the order total
    Percentage,
    /// `value` currency units off the order total
    Fixed,
}

/// Database model for promocode
#[derive(Debug, Clone, FromRow)]
pub struct Promocode {
    pub id: Uuid,
    /// Stored upper-case
    pub code: String,
    pub discount_type: DiscountType,
    pub value: Decimal,
    pub min_order_total: Decimal,
    /// 0 means unlimited
    pub max_uses: i32,
    pub used_count: i32,
    pub is_active: bool,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
