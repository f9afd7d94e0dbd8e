use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::products::models::ProductType;

/// Stored cart row joined with whatever is left of its product.
///
/// Product columns are `None` when the product has been deleted.
#[derive(Debug, Clone, FromRow)]
pub struct CartRow {
    pub product_id: Uuid,
    pub item_type: ProductType,
    pub quantity: i32,
    pub title: Option<String>,
    pub price: Option<Decimal>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
    pub category_title: Option<String>,
}
