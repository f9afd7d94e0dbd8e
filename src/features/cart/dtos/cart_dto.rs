use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::cart::reconcile::{CartLine, Reconciled};
use crate::features::products::models::ProductType;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartItemDto {
    pub product_id: Uuid,
    pub item_type: ProductType,
    pub title: String,
    #[schema(value_type = String)]
    pub price: Decimal,
    pub quantity: i32,
    #[schema(value_type = String)]
    pub line_total: Decimal,
    pub image_url: Option<String>,
    pub category_title: Option<String>,
}

impl From<CartLine> for CartItemDto {
    fn from(l: CartLine) -> Self {
        Self {
            product_id: l.product_id,
            item_type: l.item_type,
            title: l.title,
            price: l.price,
            quantity: l.quantity,
            line_total: l.line_total,
            image_url: l.image_url,
            category_title: l.category_title,
        }
    }
}

/// Reconciled cart
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartResponseDto {
    pub items: Vec<CartItemDto>,
    /// Products dropped because they were deleted or deactivated
    pub removed_items: Vec<Uuid>,
    pub items_count: i64,
    #[schema(value_type = String)]
    pub total: Decimal,
}

impl From<Reconciled> for CartResponseDto {
    fn from(r: Reconciled) -> Self {
        let total = r.total();
        let items_count = r.items_count();
        Self {
            items: r.lines.into_iter().map(Into::into).collect(),
            removed_items: r.removed,
            items_count,
            total,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AddCartItemDto {
    pub product_id: Uuid,
    #[validate(range(min = 1, max = 99, message = "Quantity must be 1-99"))]
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateCartItemDto {
    /// 0 removes the line
    #[validate(range(min = 0, max = 99, message = "Quantity must be 0-99"))]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::cart::reconcile::{reconcile, test_support::row};

    #[test]
    fn test_response_from_reconciled() {
        let dto: CartResponseDto =
            reconcile(vec![row(1, "100", 2, true), row(2, "5", 1, false)]).into();

        assert_eq!(dto.items.len(), 1);
        assert_eq!(dto.items_count, 2);
        assert_eq!(dto.total, Decimal::from(200));
        assert_eq!(dto.removed_items, vec![Uuid::from_u128(2)]);
    }

    #[test]
    fn test_add_defaults_to_one() {
        let dto: AddCartItemDto =
            serde_json::from_str(r#"{"product_id":"0190f3d4-7a35-7c4b-9d6e-1a2b3c4d5e6f"}"#)
                .unwrap();
        assert_eq!(dto.quantity, 1);
        assert!(dto.validate().is_ok());
    }
}
