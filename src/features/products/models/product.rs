use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::categories::models::CategoryType;

/// Kind of item sold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "product_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Basket,
    Course,
}

impl ProductType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Basket => "basket",
            ProductType::Course => "course",
        }
    }

    /// Category tree this kind of product is filed under
    pub fn category_type(&self) -> CategoryType {
        match self {
            ProductType::Basket => CategoryType::Product,
            ProductType::Course => CategoryType::Course,
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database model for product, joined with its category title
#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub product_type: ProductType,
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub category_id: Option<Uuid>,
    pub category_title: Option<String>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_type_maps_to_category_type() {
        assert_eq!(ProductType::Basket.category_type(), CategoryType::Product);
        assert_eq!(ProductType::Course.category_type(), CategoryType::Course);
    }
}
