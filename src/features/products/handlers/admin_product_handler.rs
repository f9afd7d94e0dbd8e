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
use crate::features::auth::guards::RequireAdmin;
use crate::features::products::dtos::{
    CreateProductDto, ProductListQuery, ProductResponseDto, UpdateProductDto,
};
use crate::features::products::services::ProductService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// List all products, including inactive ones
#[utoipa::path(
    get,
    path = "/api/admin/products",
    params(ProductListQuery, PaginationQuery),
    responses(
        (status = 200, description = "Products", body = ApiResponse<Vec<ProductResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin-catalog",
    security(("bearer_auth" = []))
)]
pub async fn admin_list_products(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<ProductService>>,
    Query(filter): Query<ProductListQuery>,
    Query(params): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ProductResponseDto>>>> {
    let (products, total) = service
        .list(
            filter.product_type,
            filter.category_id,
            false,
            params.offset(),
            params.limit(),
        )
        .await?;

    let dtos: Vec<ProductResponseDto> = products.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Create a product
#[utoipa::path(
    post,
    path = "/api/admin/products",
    request_body = CreateProductDto,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<ProductResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "admin-catalog",
    security(("bearer_auth" = []))
)]
pub async fn create_product(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<ProductService>>,
    AppJson(dto): AppJson<CreateProductDto>,
) -> Result<(StatusCode, Json<ApiResponse<ProductResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let product = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(product.into()), None, None)),
    ))
}

/// Update a product
#[utoipa::path(
    put,
    path = "/api/admin/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = UpdateProductDto,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<ProductResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Product not found")
    ),
    tag = "admin-catalog",
    security(("bearer_auth" = []))
)]
pub async fn update_product(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<ProductService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateProductDto>,
) -> Result<Json<ApiResponse<ProductResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let product = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(product.into()), None, None)))
}

/// Activate or deactivate a product
#[utoipa::path(
    post,
    path = "/api/admin/products/{id}/toggle",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Active flag flipped", body = ApiResponse<ProductResponseDto>),
        (status = 404, description = "Product not found")
    ),
    tag = "admin-catalog",
    security(("bearer_auth" = []))
)]
pub async fn toggle_product(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<ProductService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ProductResponseDto>>> {
    let product = service.toggle(id).await?;
    Ok(Json(ApiResponse::success(Some(product.into()), None, None)))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 404, description = "Product not found")
    ),
    tag = "admin-catalog",
    security(("bearer_auth" = []))
)]
pub async fn delete_product(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<ProductService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Product deleted".to_string()),
        None,
    )))
}
