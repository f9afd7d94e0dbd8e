use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::cart::dtos::{AddCartItemDto, CartResponseDto, UpdateCartItemDto};
use crate::features::cart::services::CartService;
use crate::shared::types::ApiResponse;

/// Get the reconciled cart
#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart with removed_items for dropped products", body = ApiResponse<CartResponseDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "cart",
    security(("bearer_auth" = []))
)]
pub async fn get_cart(
    user: AuthenticatedUser,
    State(service): State<Arc<CartService>>,
) -> Result<Json<ApiResponse<CartResponseDto>>> {
    let cart = service.get(user.telegram_id).await?;
    Ok(Json(ApiResponse::success(Some(cart.into()), None, None)))
}

/// Add a product to the cart
#[utoipa::path(
    post,
    path = "/api/cart/items",
    request_body = AddCartItemDto,
    responses(
        (status = 200, description = "Updated cart", body = ApiResponse<CartResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Product not found or inactive")
    ),
    tag = "cart",
    security(("bearer_auth" = []))
)]
pub async fn add_cart_item(
    user: AuthenticatedUser,
    State(service): State<Arc<CartService>>,
    AppJson(dto): AppJson<AddCartItemDto>,
) -> Result<Json<ApiResponse<CartResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let cart = service
        .add(user.telegram_id, dto.product_id, dto.quantity)
        .await?;
    Ok(Json(ApiResponse::success(Some(cart.into()), None, None)))
}

/// Set the quantity of a cart line
#[utoipa::path(
    put,
    path = "/api/cart/items/{product_id}",
    params(("product_id" = Uuid, Path, description = "Product id")),
    request_body = UpdateCartItemDto,
    responses(
        (status = 200, description = "Updated cart", body = ApiResponse<CartResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Product is not in the cart")
    ),
    tag = "cart",
    security(("bearer_auth" = []))
)]
pub async fn update_cart_item(
    user: AuthenticatedUser,
    State(service): State<Arc<CartService>>,
    Path(product_id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateCartItemDto>,
) -> Result<Json<ApiResponse<CartResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let cart = service
        .set_quantity(user.telegram_id, product_id, dto.quantity)
        .await?;
    Ok(Json(ApiResponse::success(Some(cart.into()), None, None)))
}

/// Remove a cart line
#[utoipa::path(
    delete,
    path = "/api/cart/items/{product_id}",
    params(("product_id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Updated cart", body = ApiResponse<CartResponseDto>)
    ),
    tag = "cart",
    security(("bearer_auth" = []))
)]
pub async fn remove_cart_item(
    user: AuthenticatedUser,
    State(service): State<Arc<CartService>>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<ApiResponse<CartResponseDto>>> {
    let cart = service.remove(user.telegram_id, product_id).await?;
    Ok(Json(ApiResponse::success(Some(cart.into()), None, None)))
}

/// Empty the cart
#[utoipa::path(
    delete,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart cleared")
    ),
    tag = "cart",
    security(("bearer_auth" = []))
)]
pub async fn clear_cart(
    user: AuthenticatedUser,
    State(service): State<Arc<CartService>>,
) -> Result<Json<ApiResponse<()>>> {
    service.clear(user.telegram_id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Cart cleared".to_string()),
        None,
    )))
}
