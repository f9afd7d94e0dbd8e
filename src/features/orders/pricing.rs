//! Order totals and the item snapshot taken from a reconciled cart.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::cart::reconcile::Reconciled;
use crate::features::products::models::ProductType;
use crate::features::promocodes::rules::Discount;

/// One order line as it will be stored
#[derive(Debug, Clone, PartialEq)]
pub struct DraftItem {
    pub product_id: Uuid,
    pub product_type: ProductType,
    pub title: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub line_total: Decimal,
}

/// Everything checkout writes to `orders` and `order_items`
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub items: Vec<DraftItem>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

impl OrderDraft {
    /// Snapshot the live cart lines at their current prices
    pub fn from_cart(cart: &Reconciled) -> Result<Self> {
        if cart.is_empty() {
            return Err(AppError::BadRequest("Cart is empty".to_string()));
        }

        let items: Vec<DraftItem> = cart
            .lines
            .iter()
            .map(|line| DraftItem {
                product_id: line.product_id,
                product_type: line.item_type,
                title: line.title.clone(),
                unit_price: line.price,
                quantity: line.quantity,
                line_total: line.line_total,
            })
            .collect();
        let subtotal = items.iter().map(|i| i.line_total).sum();

        Ok(Self {
            items,
            subtotal,
            discount: Decimal::ZERO,
            total: subtotal,
        })
    }

    /// Apply a promocode discount, keeping `total = subtotal - discount`
    /// and `0 <= discount <= subtotal`
    pub fn apply_discount(&mut self, discount: &Discount) {
        self.discount = discount.discount.clamp(Decimal::ZERO, self.subtotal);
        self.total = self.subtotal - self.discount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::cart::reconcile::{reconcile, test_support::*};
    use crate::features::promocodes::models::DiscountType;
    use crate::features::promocodes::rules::compute_discount;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn discount(discount_type: DiscountType, value: &str, total: Decimal) -> Discount {
        let amount = compute_discount(discount_type, dec(value), total);
        Discount {
            code: "SAVE10".to_string(),
            discount_type,
            value: dec(value),
            total,
            discount: amount,
            final_total: total - amount,
        }
    }

    #[test]
    fn test_empty_cart_rejected() {
        let result = OrderDraft::from_cart(&Reconciled::default());
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_snapshot_skips_removed_products() {
        let cart = reconcile(vec![
            row(1, "200", 2, true),
            row(2, "999", 1, false),
            deleted_row(3, 4),
            row(4, "100", 1, true),
        ]);

        let draft = OrderDraft::from_cart(&cart).unwrap();

        assert_eq!(draft.items.len(), 2);
        assert_eq!(draft.items[0].product_id, Uuid::from_u128(1));
        assert_eq!(draft.items[0].unit_price, dec("200"));
        assert_eq!(draft.items[0].line_total, dec("400"));
        assert_eq!(draft.items[1].product_id, Uuid::from_u128(4));
        assert_eq!(draft.subtotal, dec("500"));
        assert_eq!(draft.discount, Decimal::ZERO);
        assert_eq!(draft.total, dec("500"));
    }

    #[test]
    fn test_percentage_discount_applied() {
        let cart = reconcile(vec![row(1, "200", 2, true), row(2, "100", 1, true)]);
        let mut draft = OrderDraft::from_cart(&cart).unwrap();

        draft.apply_discount(&discount(DiscountType::Percentage, "10", draft.subtotal));

        assert_eq!(draft.subtotal, dec("500"));
        assert_eq!(draft.discount, dec("50"));
        assert_eq!(draft.total, dec("450"));
    }

    #[test]
    fn test_fixed_discount_never_exceeds_subtotal() {
        let cart = reconcile(vec![row(1, "120", 1, true)]);
        let mut draft = OrderDraft::from_cart(&cart).unwrap();

        draft.apply_discount(&discount(DiscountType::Fixed, "500", dec("1000")));

        assert_eq!(draft.discount, dec("120"));
        assert_eq!(draft.total, Decimal::ZERO);
        assert_eq!(draft.total, draft.subtotal - draft.discount);
    }
}
