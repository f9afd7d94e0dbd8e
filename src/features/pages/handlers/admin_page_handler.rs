use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::pages::dtos::{
    ApplyThemeDto, PageResponseDto, ThemeResponseDto, ThemeTemplateDto, UpdatePageDto,
};
use crate::features::pages::services::PageService;
use crate::features::pages::themes::THEMES;
use crate::shared::types::{ApiResponse, Meta};

/// Create or replace a page
#[utoipa::path(
    put,
    path = "/api/admin/pages/{slug}",
    params(("slug" = String, Path, description = "Page slug")),
    request_body = UpdatePageDto,
    responses(
        (status = 200, description = "Page saved", body = ApiResponse<PageResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin-pages",
    security(("bearer_auth" = []))
)]
pub async fn update_page(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<PageService>>,
    Path(slug): Path<String>,
    AppJson(dto): AppJson<UpdatePageDto>,
) -> Result<Json<ApiResponse<PageResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let page = service.upsert_page(&slug, dto, admin.telegram_id).await?;
    Ok(Json(ApiResponse::success(
        Some(page),
        Some("Page saved".to_string()),
        None,
    )))
}

/// Built-in theme templates
#[utoipa::path(
    get,
    path = "/api/admin/themes",
    responses(
        (status = 200, description = "Theme templates", body = ApiResponse<Vec<ThemeTemplateDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin-pages",
    security(("bearer_auth" = []))
)]
pub async fn list_themes(
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<ApiResponse<Vec<ThemeTemplateDto>>>> {
    let templates: Vec<ThemeTemplateDto> = THEMES.iter().map(Into::into).collect();
    let total = templates.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(templates),
        None,
        Some(Meta { total }),
    )))
}

/// Apply a built-in theme to the storefront
#[utoipa::path(
    post,
    path = "/api/admin/themes/apply",
    request_body = ApplyThemeDto,
    responses(
        (status = 200, description = "Theme applied", body = ApiResponse<ThemeResponseDto>),
        (status = 404, description = "Unknown theme template"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin-pages",
    security(("bearer_auth" = []))
)]
pub async fn apply_theme(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<PageService>>,
    AppJson(dto): AppJson<ApplyThemeDto>,
) -> Result<Json<ApiResponse<ThemeResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let theme = service.apply_theme(&dto.template_id, admin.telegram_id).await?;
    Ok(Json(ApiResponse::success(
        Some(theme),
        Some("Theme applied".to_string()),
        None,
    )))
}
