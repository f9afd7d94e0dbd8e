use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::products::models::{Product, ProductType};

/// Filters for product listings
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ProductListQuery {
    #[serde(rename = "type")]
    pub product_type: Option<ProductType>,
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductResponseDto {
    pub id: Uuid,
    pub product_type: ProductType,
    pub title: String,
    pub description: Option<String>,
    #[schema(value_type = String, example = "1500.00")]
    pub price: Decimal,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub category_id: Option<Uuid>,
    pub category_title: Option<String>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponseDto {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            product_type: p.product_type,
            title: p.title,
            description: p.description,
            price: p.price,
            image_url: p.image_url,
            is_active: p.is_active,
            category_id: p.category_id,
            category_title: p.category_title,
            sort_order: p.sort_order,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProductDto {
    pub product_type: ProductType,

    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = String, example = "1500.00")]
    pub price: Decimal,

    #[validate(length(max = 1000, message = "Image URL must be at most 1000 characters"))]
    pub image_url: Option<String>,

    pub category_id: Option<Uuid>,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[serde(default)]
    pub sort_order: i32,
}

/// Partial update, absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProductDto {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = Option<String>, example = "1500.00")]
    pub price: Option<Decimal>,

    #[validate(length(max = 1000, message = "Image URL must be at most 1000 characters"))]
    pub image_url: Option<String>,

    pub category_id: Option<Uuid>,

    /// Remove the product from its category
    #[serde(default)]
    pub clear_category: bool,

    pub is_active: Option<bool>,

    pub sort_order: Option<i32>,
}

fn default_true() -> bool {
    true
}

/// Price must be non-negative, at most two decimals and fit NUMERIC(12,2)
fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        return Err(ValidationError::new("price").with_message("Price cannot be negative".into()));
    }
    if price.normalize().scale() > 2 {
        return Err(
            ValidationError::new("price").with_message("Price has at most two decimals".into())
        );
    }
    if *price >= Decimal::from(10_000_000_000i64) {
        return Err(ValidationError::new("price").with_message("Price is too large".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_validate_price() {
        assert!(validate_price(&Decimal::from(0)).is_ok());
        assert!(validate_price(&Decimal::from_str("1500.50").unwrap()).is_ok());
        assert!(validate_price(&Decimal::from_str("10.500").unwrap()).is_ok());
        assert!(validate_price(&Decimal::from_str("-1").unwrap()).is_err());
        assert!(validate_price(&Decimal::from_str("9.999").unwrap()).is_err());
    }

    #[test]
    fn test_create_dto_defaults() {
        let dto: CreateProductDto = serde_json::from_str(
            r#"{"product_type":"basket","title":"Fruit basket","price":"1500.00"}"#,
        )
        .unwrap();
        assert!(dto.is_active);
        assert_eq!(dto.sort_order, 0);
        assert!(dto.validate().is_ok());
    }
}
