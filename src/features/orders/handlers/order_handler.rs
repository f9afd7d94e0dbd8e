use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::orders::dtos::{CreateOrderDto, OrderResponseDto};
use crate::features::orders::models::OrderSource;
use crate::features::orders::services::OrderService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// Place an order from the current cart
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderDto,
    responses(
        (status = 201, description = "Order created", body = ApiResponse<OrderResponseDto>),
        (status = 400, description = "Empty cart, validation error or invalid promocode"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "User is banned"),
        (status = 409, description = "Promocode was used up concurrently")
    ),
    tag = "orders",
    security(("bearer_auth" = []))
)]
pub async fn create_order(
    user: AuthenticatedUser,
    State(service): State<Arc<OrderService>>,
    AppJson(dto): AppJson<CreateOrderDto>,
) -> Result<(StatusCode, Json<ApiResponse<OrderResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let order = service
        .checkout(user.telegram_id, dto, OrderSource::Web)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(order.into()), None, None)),
    ))
}

/// List own orders
#[utoipa::path(
    get,
    path = "/api/orders",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Orders of the current user", body = ApiResponse<Vec<OrderResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "orders",
    security(("bearer_auth" = []))
)]
pub async fn list_my_orders(
    user: AuthenticatedUser,
    State(service): State<Arc<OrderService>>,
    Query(params): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<OrderResponseDto>>>> {
    let (orders, total) = service
        .list_for_user(user.telegram_id, params.offset(), params.limit())
        .await?;
    let dtos: Vec<OrderResponseDto> = orders.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Get one of own orders
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order details", body = ApiResponse<OrderResponseDto>),
        (status = 404, description = "Order not found")
    ),
    tag = "orders",
    security(("bearer_auth" = []))
)]
pub async fn get_my_order(
    user: AuthenticatedUser,
    State(service): State<Arc<OrderService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<OrderResponseDto>>> {
    let order = service.get_for_user(user.telegram_id, id).await?;
    Ok(Json(ApiResponse::success(Some(order.into()), None, None)))
}
