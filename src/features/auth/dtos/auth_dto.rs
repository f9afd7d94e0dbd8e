use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::auth::model::Role;
use crate::features::users::dtos::UserResponseDto;

/// Request body carrying Telegram WebApp `initData`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct WebAppAuthRequestDto {
    /// Raw `window.Telegram.WebApp.initData` query string
    #[validate(length(min = 1, max = 4096, message = "init_data is required"))]
    pub init_data: String,
}

/// Payload produced by the Telegram Login Widget
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginWidgetRequestDto {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub photo_url: Option<String>,
    pub auth_date: i64,
    #[validate(length(equal = 64, message = "hash must be 64 hex characters"))]
    pub hash: String,
}

/// Successful login
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthResponseDto {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: i64,
    pub user: AuthUserDto,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthUserDto {
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub photo_url: Option<String>,
    pub role: Role,
}

/// Current session identity
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MeResponseDto {
    pub role: Role,
    pub user: UserResponseDto,
}
