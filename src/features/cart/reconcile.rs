//! Cart and favorites reconciliation.
//!
//! Stored rows are matched against the live catalog: rows whose product is
//! gone or inactive are dropped and reported, the rest are priced at the
//! current product price.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::features::cart::models::CartRow;
use crate::features::products::models::ProductType;

/// A priced cart line backed by an active product
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product_id: Uuid,
    pub item_type: ProductType,
    pub title: String,
    pub price: Decimal,
    pub quantity: i32,
    pub line_total: Decimal,
    pub image_url: Option<String>,
    pub category_title: Option<String>,
}

/// Outcome of reconciling stored rows against the catalog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciled {
    pub lines: Vec<CartLine>,
    /// Product ids whose rows must be deleted
    pub removed: Vec<Uuid>,
}

impl Reconciled {
    /// Σ price × quantity over surviving lines
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(|l| l.line_total).sum()
    }

    /// Number of units across surviving lines
    pub fn items_count(&self) -> i64 {
        self.lines.iter().map(|l| i64::from(l.quantity)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Split rows into priced lines and removed product ids, keeping row order
pub fn reconcile(rows: Vec<CartRow>) -> Reconciled {
    let mut result = Reconciled::default();

    for row in rows {
        match (row.title, row.price, row.is_active) {
            (Some(title), Some(price), Some(true)) => {
                result.lines.push(CartLine {
                    product_id: row.product_id,
                    item_type: row.item_type,
                    line_total: price * Decimal::from(row.quantity),
                    title,
                    price,
                    quantity: row.quantity,
                    image_url: row.image_url,
                    category_title: row.category_title,
                });
            }
            _ => {
                if !result.removed.contains(&row.product_id) {
                    result.removed.push(row.product_id);
                }
            }
        }
    }

    result
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::str::FromStr;

    pub fn row(id: u128, price: &str, quantity: i32, active: bool) -> CartRow {
        CartRow {
            product_id: Uuid::from_u128(id),
            item_type: ProductType::Basket,
            quantity,
            title: Some(format!("Product {}", id)),
            price: Some(Decimal::from_str(price).unwrap()),
            image_url: None,
            is_active: Some(active),
            category_title: Some("Fruit".to_string()),
        }
    }

    pub fn deleted_row(id: u128, quantity: i32) -> CartRow {
        CartRow {
            product_id: Uuid::from_u128(id),
            item_type: ProductType::Course,
            quantity,
            title: None,
            price: None,
            image_url: None,
            is_active: None,
            category_title: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_active_and_deactivated_product() {
        let result = reconcile(vec![row(1, "250.00", 2, true), row(2, "99.90", 1, false)]);

        assert_eq!(result.lines.len(), 1);
        assert_eq!(result.lines[0].product_id, Uuid::from_u128(1));
        assert_eq!(result.removed, vec![Uuid::from_u128(2)]);
        assert_eq!(result.total(), dec("500.00"));
    }

    #[test]
    fn test_deleted_product_reported() {
        let result = reconcile(vec![deleted_row(7, 3), row(1, "10", 1, true)]);

        assert_eq!(result.removed, vec![Uuid::from_u128(7)]);
        assert_eq!(result.items_count(), 1);
        assert_eq!(result.total(), dec("10"));
    }

    #[test]
    fn test_total_sums_only_surviving_lines() {
        let result = reconcile(vec![
            row(1, "19.99", 3, true),
            row(2, "1000", 5, false),
            row(3, "0.01", 99, true),
            deleted_row(4, 2),
        ]);

        assert_eq!(result.total(), dec("59.97") + dec("0.99"));
        assert_eq!(result.items_count(), 102);
        assert_eq!(result.removed.len(), 2);
    }

    #[test]
    fn test_empty_cart() {
        let result = reconcile(Vec::new());
        assert!(result.is_empty());
        assert_eq!(result.total(), Decimal::ZERO);
        assert!(result.removed.is_empty());
    }

    #[test]
    fn test_line_total_uses_current_price() {
        let result = reconcile(vec![row(1, "12.50", 4, true)]);
        assert_eq!(result.lines[0].line_total, dec("50.00"));
        assert_eq!(result.lines[0].category_title.as_deref(), Some("Fruit"));
    }
}
