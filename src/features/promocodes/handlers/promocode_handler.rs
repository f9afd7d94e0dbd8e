use std::sync::Arc;

use axum::{extract::State, Json};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::promocodes::dtos::{CheckPromocodeDto, PromocodeCheckResponseDto};
use crate::features::promocodes::services::PromocodeService;
use crate::shared::types::ApiResponse;

/// Check a promocode against an order total
///
/// Nothing is redeemed; the code is consumed only when an order is placed.
#[utoipa::path(
    post,
    path = "/api/promocodes/check",
    request_body = CheckPromocodeDto,
    responses(
        (status = 200, description = "Discount that would apply", body = ApiResponse<PromocodeCheckResponseDto>),
        (status = 400, description = "Invalid promocode, reason listed in errors"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "promocodes",
    security(("bearer_auth" = []))
)]
pub async fn check_promocode(
    user: AuthenticatedUser,
    State(service): State<Arc<PromocodeService>>,
    AppJson(dto): AppJson<CheckPromocodeDto>,
) -> Result<Json<ApiResponse<PromocodeCheckResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let discount = service
        .check(user.telegram_id, &dto.code, dto.total)
        .await?;
    Ok(Json(ApiResponse::success(Some(discount.into()), None, None)))
}
