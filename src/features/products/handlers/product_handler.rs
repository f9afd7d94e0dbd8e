use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::products::dtos::{ProductListQuery, ProductResponseDto};
use crate::features::products::services::ProductService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// List active products
#[utoipa::path(
    get,
    path = "/api/products",
    params(ProductListQuery, PaginationQuery),
    responses(
        (status = 200, description = "Active products", body = ApiResponse<Vec<ProductResponseDto>>),
    ),
    tag = "products"
)]
pub async fn list_products(
    State(service): State<Arc<ProductService>>,
    Query(filter): Query<ProductListQuery>,
    Query(params): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ProductResponseDto>>>> {
    let (products, total) = service
        .list(
            filter.product_type,
            filter.category_id,
            true,
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

/// Get an active product
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product details", body = ApiResponse<ProductResponseDto>),
        (status = 404, description = "Product not found or inactive")
    ),
    tag = "products"
)]
pub async fn get_product(
    State(service): State<Arc<ProductService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ProductResponseDto>>> {
    let product = service.get_active(id).await?;
    Ok(Json(ApiResponse::success(Some(product.into()), None, None)))
}
