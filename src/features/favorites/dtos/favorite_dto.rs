use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::cart::reconcile::{CartLine, Reconciled};
use crate::features::products::models::ProductType;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FavoriteItemDto {
    pub product_id: Uuid,
    pub product_type: ProductType,
    pub title: String,
    #[schema(value_type = String)]
    pub price: Decimal,
    pub image_url: Option<String>,
    pub category_title: Option<String>,
}

impl From<CartLine> for FavoriteItemDto {
    fn from(l: CartLine) -> Self {
        Self {
            product_id: l.product_id,
            product_type: l.item_type,
            title: l.title,
            price: l.price,
            image_url: l.image_url,
            category_title: l.category_title,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FavoritesResponseDto {
    pub items: Vec<FavoriteItemDto>,
    /// Products dropped because they were deleted or deactivated
    pub removed_items: Vec<Uuid>,
}

impl From<Reconciled> for FavoritesResponseDto {
    fn from(r: Reconciled) -> Self {
        Self {
            items: r.lines.into_iter().map(Into::into).collect(),
            removed_items: r.removed,
        }
    }
}
