use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::users::dtos::{
    BanUserDto, CreateNoteDto, UserBanResponseDto, UserListQuery, UserNoteResponseDto,
    UserResponseDto,
};
use crate::features::users::services::UserService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// List users (paginated)
#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(PaginationQuery, UserListQuery),
    responses(
        (status = 200, description = "List of users", body = ApiResponse<Vec<UserResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin-users",
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<UserService>>,
    Query(params): Query<PaginationQuery>,
    Query(filter): Query<UserListQuery>,
) -> Result<Json<ApiResponse<Vec<UserResponseDto>>>> {
    let (users, total) = service
        .list(
            filter.banned,
            filter.search.as_deref(),
            params.offset(),
            params.limit(),
        )
        .await?;

    let dtos: Vec<UserResponseDto> = users.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Get a user by Telegram id
#[utoipa::path(
    get,
    path = "/api/admin/users/{id}",
    params(("id" = i64, Path, description = "Telegram user id")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<UserResponseDto>),
        (status = 404, description = "User not found")
    ),
    tag = "admin-users",
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<UserService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    let user = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(user.into()), None, None)))
}

/// Ban a user
#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/ban",
    params(("id" = i64, Path, description = "Telegram user id")),
    request_body = BanUserDto,
    responses(
        (status = 200, description = "User banned", body = ApiResponse<UserResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "User not found")
    ),
    tag = "admin-users",
    security(("bearer_auth" = []))
)]
pub async fn ban_user(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<UserService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<BanUserDto>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let reason = dto.reason.as_deref().map(str::trim).filter(|r| !r.is_empty());
    let user = service.ban(id, reason, admin.telegram_id).await?;
    Ok(Json(ApiResponse::success(
        Some(user.into()),
        Some("User banned".to_string()),
        None,
    )))
}

/// Unban a user
#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/unban",
    params(("id" = i64, Path, description = "Telegram user id")),
    responses(
        (status = 200, description = "User unbanned", body = ApiResponse<UserResponseDto>),
        (status = 404, description = "User not found")
    ),
    tag = "admin-users",
    security(("bearer_auth" = []))
)]
pub async fn unban_user(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<UserService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    let user = service.unban(id, admin.telegram_id).await?;
    Ok(Json(ApiResponse::success(
        Some(user.into()),
        Some("User unbanned".to_string()),
        None,
    )))
}

/// Ban history of a user
#[utoipa::path(
    get,
    path = "/api/admin/users/{id}/bans",
    params(("id" = i64, Path, description = "Telegram user id")),
    responses(
        (status = 200, description = "Ban history", body = ApiResponse<Vec<UserBanResponseDto>>),
        (status = 404, description = "User not found")
    ),
    tag = "admin-users",
    security(("bearer_auth" = []))
)]
pub async fn list_user_bans(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<UserService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<UserBanResponseDto>>>> {
    let bans = service.list_bans(id).await?;
    let dtos: Vec<UserBanResponseDto> = bans.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}

/// Admin notes on a user
#[utoipa::path(
    get,
    path = "/api/admin/users/{id}/notes",
    params(("id" = i64, Path, description = "Telegram user id")),
    responses(
        (status = 200, description = "Notes", body = ApiResponse<Vec<UserNoteResponseDto>>),
        (status = 404, description = "User not found")
    ),
    tag = "admin-users",
    security(("bearer_auth" = []))
)]
pub async fn list_user_notes(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<UserService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<UserNoteResponseDto>>>> {
    let notes = service.list_notes(id).await?;
    let dtos: Vec<UserNoteResponseDto> = notes.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}

/// Add an admin note to a user
#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/notes",
    params(("id" = i64, Path, description = "Telegram user id")),
    request_body = CreateNoteDto,
    responses(
        (status = 201, description = "Note added", body = ApiResponse<UserNoteResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "User not found")
    ),
    tag = "admin-users",
    security(("bearer_auth" = []))
)]
pub async fn add_user_note(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<UserService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<CreateNoteDto>,
) -> Result<(StatusCode, Json<ApiResponse<UserNoteResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let note = service.add_note(id, admin.telegram_id, &dto.body).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(note.into()), None, None)),
    ))
}
