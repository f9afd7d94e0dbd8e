use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::Result;
use crate::features::pages::dtos::{PageResponseDto, ThemeResponseDto};
use crate::features::pages::services::PageService;
use crate::shared::types::ApiResponse;

/// Page content for the storefront (empty when missing)
#[utoipa::path(
    get,
    path = "/api/pages/{slug}",
    params(("slug" = String, Path, description = "Page slug")),
    responses(
        (status = 200, description = "Page content", body = ApiResponse<PageResponseDto>)
    ),
    tag = "pages"
)]
pub async fn get_page(
    State(service): State<Arc<PageService>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<PageResponseDto>>> {
    let page = service.get_page_or_empty(&slug).await;
    Ok(Json(ApiResponse::success(Some(page), None, None)))
}

/// Active storefront theme (defaults when none applied)
#[utoipa::path(
    get,
    path = "/api/theme",
    responses(
        (status = 200, description = "Theme variables and preset", body = ApiResponse<ThemeResponseDto>)
    ),
    tag = "pages"
)]
pub async fn get_theme(
    State(service): State<Arc<PageService>>,
) -> Result<Json<ApiResponse<ThemeResponseDto>>> {
    let theme = service.get_theme_or_default().await;
    Ok(Json(ApiResponse::success(Some(theme), None, None)))
}
