use std::sync::Arc;

use axum::{extract::State, Json};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{
    AuthResponseDto, LoginWidgetRequestDto, MeResponseDto, WebAppAuthRequestDto,
};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::AuthService;
use crate::shared::types::ApiResponse;

/// Login with Telegram WebApp initData
#[utoipa::path(
    post,
    path = "/api/auth/telegram/webapp",
    request_body = WebAppAuthRequestDto,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<AuthResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid or expired signature"),
        (status = 403, description = "User is banned")
    ),
    tag = "auth"
)]
pub async fn login_webapp(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<WebAppAuthRequestDto>,
) -> Result<Json<ApiResponse<AuthResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let auth_response = service.login_webapp(&dto.init_data).await?;
    Ok(Json(ApiResponse::success(Some(auth_response), None, None)))
}

/// Login with the Telegram Login Widget
#[utoipa::path(
    post,
    path = "/api/auth/telegram/widget",
    request_body = LoginWidgetRequestDto,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<AuthResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid or expired signature"),
        (status = 403, description = "User is banned")
    ),
    tag = "auth"
)]
pub async fn login_widget(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<LoginWidgetRequestDto>,
) -> Result<Json<ApiResponse<AuthResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let auth_response = service.login_widget(&dto).await?;
    Ok(Json(ApiResponse::success(Some(auth_response), None, None)))
}

/// Get current authenticated user info
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user retrieved successfully", body = ApiResponse<MeResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "User is banned")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(
    user: AuthenticatedUser,
    State(service): State<Arc<AuthService>>,
) -> Result<Json<ApiResponse<MeResponseDto>>> {
    let me = service.me(&user).await?;
    Ok(Json(ApiResponse::success(Some(me), None, None)))
}
