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
use crate::features::promocodes::dtos::{
    CreatePromocodeDto, PromocodeResponseDto, UpdatePromocodeDto,
};
use crate::features::promocodes::services::PromocodeService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// List promocodes (paginated)
#[utoipa::path(
    get,
    path = "/api/admin/promocodes",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Promocodes", body = ApiResponse<Vec<PromocodeResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin-promocodes",
    security(("bearer_auth" = []))
)]
pub async fn list_promocodes(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<PromocodeService>>,
    Query(params): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<PromocodeResponseDto>>>> {
    let (promocodes, total) = service.list(params.offset(), params.limit()).await?;
    let dtos: Vec<PromocodeResponseDto> = promocodes.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Create a promocode
#[utoipa::path(
    post,
    path = "/api/admin/promocodes",
    request_body = CreatePromocodeDto,
    responses(
        (status = 201, description = "Promocode created", body = ApiResponse<PromocodeResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Code already exists")
    ),
    tag = "admin-promocodes",
    security(("bearer_auth" = []))
)]
pub async fn create_promocode(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<PromocodeService>>,
    AppJson(dto): AppJson<CreatePromocodeDto>,
) -> Result<(StatusCode, Json<ApiResponse<PromocodeResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let promocode = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(promocode.into()), None, None)),
    ))
}

/// Update a promocode
#[utoipa::path(
    put,
    path = "/api/admin/promocodes/{id}",
    params(("id" = Uuid, Path, description = "Promocode id")),
    request_body = UpdatePromocodeDto,
    responses(
        (status = 200, description = "Promocode updated", body = ApiResponse<PromocodeResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Promocode not found")
    ),
    tag = "admin-promocodes",
    security(("bearer_auth" = []))
)]
pub async fn update_promocode(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<PromocodeService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdatePromocodeDto>,
) -> Result<Json<ApiResponse<PromocodeResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let promocode = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(promocode.into()), None, None)))
}

/// Delete a promocode
#[utoipa::path(
    delete,
    path = "/api/admin/promocodes/{id}",
    params(("id" = Uuid, Path, description = "Promocode id")),
    responses(
        (status = 200, description = "Promocode deleted"),
        (status = 404, description = "Promocode not found")
    ),
    tag = "admin-promocodes",
    security(("bearer_auth" = []))
)]
pub async fn delete_promocode(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<PromocodeService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Promocode deleted".to_string()),
        None,
    )))
}
