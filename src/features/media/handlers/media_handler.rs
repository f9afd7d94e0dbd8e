use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::guards::RequireAdmin;
use crate::features::media::dtos::{MediaResponseDto, UploadMediaDto};
use crate::features::media::services::MediaService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// List uploaded media (paginated)
#[utoipa::path(
    get,
    path = "/api/admin/media",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Media files", body = ApiResponse<Vec<MediaResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin-media",
    security(("bearer_auth" = []))
)]
pub async fn list_media(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<MediaService>>,
    Query(params): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<MediaResponseDto>>>> {
    let (files, total) = service.list(params.offset(), params.limit()).await?;
    let dtos: Vec<MediaResponseDto> = files.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Upload a file
///
/// Accepts multipart/form-data with a single `file` field.
#[utoipa::path(
    post,
    path = "/api/admin/media",
    request_body(
        content = UploadMediaDto,
        content_type = "multipart/form-data",
        description = "jpeg, png, webp, gif, mp4 or pdf up to 10 MB",
    ),
    responses(
        (status = 201, description = "File uploaded", body = ApiResponse<MediaResponseDto>),
        (status = 400, description = "Missing, empty, oversized or disallowed file"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 413, description = "Request body too large")
    ),
    tag = "admin-media",
    security(("bearer_auth" = []))
)]
pub async fn upload_media(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<MediaService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<MediaResponseDto>>)> {
    let mut upload: Option<(Vec<u8>, String, String)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        if field.name() != Some("file") {
            debug!("Ignoring multipart field {:?}", field.name());
            continue;
        }

        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let file_name = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unnamed".to_string());
        let data = field.bytes().await.map_err(|e| {
            debug!("Failed to read file bytes: {}", e);
            AppError::BadRequest(format!("Failed to read file data: {}", e))
        })?;

        upload = Some((data.to_vec(), file_name, content_type));
    }

    let (data, file_name, content_type) =
        upload.ok_or_else(|| AppError::BadRequest("File is required".to_string()))?;

    let file = service
        .upload(data, &file_name, &content_type, admin.telegram_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(file.into()), None, None)),
    ))
}

/// Delete an uploaded file
#[utoipa::path(
    delete,
    path = "/api/admin/media/{id}",
    params(("id" = Uuid, Path, description = "Media file id")),
    responses(
        (status = 200, description = "File deleted"),
        (status = 404, description = "Media file not found"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin-media",
    security(("bearer_auth" = []))
)]
pub async fn delete_media(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<MediaService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("File deleted".to_string()),
        None,
    )))
}
