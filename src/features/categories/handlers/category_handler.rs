use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::core::error::Result;
use crate::features::categories::dtos::{
    CategoryListing, CategoryResponseDto, CategoryTypeQuery, ListCategoriesQuery,
};
use crate::features::categories::services::CategoryService;
use crate::shared::types::ApiResponse;

/// List all active categories
///
/// Returns categories as flat list or tree structure based on `tree` query param.
#[utoipa::path(
    get,
    path = "/api/categories",
    params(ListCategoriesQuery),
    responses(
        (status = 200, description = "List of categories", body = ApiResponse<CategoryListing>),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
    Query(query): Query<ListCategoriesQuery>,
) -> Result<Json<ApiResponse<CategoryListing>>> {
    let listing = if query.tree {
        CategoryListing::Tree(service.list_tree(query.category_type).await?)
    } else {
        CategoryListing::Flat(service.list(query.category_type).await?)
    };
    Ok(Json(ApiResponse::success(Some(listing), None, None)))
}

/// Get category by slug
#[utoipa::path(
    get,
    path = "/api/categories/{slug}",
    params(
        ("slug" = String, Path, description = "Category slug"),
        CategoryTypeQuery
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryResponseDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(service): State<Arc<CategoryService>>,
    Path(slug): Path<String>,
    Query(query): Query<CategoryTypeQuery>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = service.get_by_slug(&slug, query.category_type).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}
