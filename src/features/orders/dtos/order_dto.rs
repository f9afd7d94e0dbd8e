use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::orders::models::{OrderItem, OrderSource, OrderStatus, OrderWithItems};
use crate::features::products::models::ProductType;

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateOrderDto {
    #[validate(length(max = 64, message = "Promocode is too long"))]
    pub promocode: Option<String>,

    #[validate(length(max = 200, message = "Name must be at most 200 characters"))]
    pub customer_name: Option<String>,

    #[validate(length(max = 32, message = "Phone must be at most 32 characters"))]
    pub customer_phone: Option<String>,

    #[validate(length(max = 1000, message = "Comment must be at most 1000 characters"))]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderItemDto {
    pub product_id: Uuid,
    pub product_type: ProductType,
    pub title: String,
    #[schema(value_type = String)]
    pub unit_price: Decimal,
    pub quantity: i32,
    #[schema(value_type = String)]
    pub line_total: Decimal,
}

impl From<OrderItem> for OrderItemDto {
    fn from(i: OrderItem) -> Self {
        Self {
            product_id: i.product_id,
            product_type: i.product_type,
            title: i.title,
            unit_price: i.unit_price,
            quantity: i.quantity,
            line_total: i.line_total,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderResponseDto {
    pub id: Uuid,
    pub number: i64,
    pub user_id: i64,
    pub status: OrderStatus,
    #[schema(value_type = String)]
    pub subtotal: Decimal,
    #[schema(value_type = String)]
    pub discount: Decimal,
    #[schema(value_type = String)]
    pub total: Decimal,
    pub promocode: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub comment: Option<String>,
    pub source: OrderSource,
    pub items: Vec<OrderItemDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OrderWithItems> for OrderResponseDto {
    fn from(o: OrderWithItems) -> Self {
        let order = o.order;
        Self {
            id: order.id,
            number: order.number,
            user_id: order.user_id,
            status: order.status,
            subtotal: order.subtotal,
            discount: order.discount,
            total: order.total,
            promocode: order.promocode_code,
            customer_name: order.customer_name,
            customer_phone: order.customer_phone,
            comment: order.comment,
            source: order.source,
            items: o.items.into_iter().map(Into::into).collect(),
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct OrderStatusQuery {
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateOrderStatusDto {
    pub status: OrderStatus,
}
