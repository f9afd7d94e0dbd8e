use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::orders::dtos::{OrderResponseDto, OrderStatusQuery, UpdateOrderStatusDto};
use crate::features::orders::services::OrderService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// List all orders (paginated)
#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(PaginationQuery, OrderStatusQuery),
    responses(
        (status = 200, description = "Orders", body = ApiResponse<Vec<OrderResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin-orders",
    security(("bearer_auth" = []))
)]
pub async fn admin_list_orders(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<OrderService>>,
    Query(params): Query<PaginationQuery>,
    Query(filter): Query<OrderStatusQuery>,
) -> Result<Json<ApiResponse<Vec<OrderResponseDto>>>> {
    let (orders, total) = service
        .list_all(filter.status, params.offset(), params.limit())
        .await?;
    let dtos: Vec<OrderResponseDto> = orders.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Change the status of an order
#[utoipa::path(
    patch,
    path = "/api/admin/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = UpdateOrderStatusDto,
    responses(
        (status = 200, description = "Order updated", body = ApiResponse<OrderResponseDto>),
        (status = 400, description = "Transition not allowed"),
        (status = 404, description = "Order not found")
    ),
    tag = "admin-orders",
    security(("bearer_auth" = []))
)]
pub async fn update_order_status(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<OrderService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateOrderStatusDto>,
) -> Result<Json<ApiResponse<OrderResponseDto>>> {
    let order = service.update_status(id, dto.status).await?;
    Ok(Json(ApiResponse::success(Some(order.into()), None, None)))
}
