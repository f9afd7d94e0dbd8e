use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::users::models::{BanAction, User, UserBan, UserNote};

/// User as seen by the admin panel and `/api/auth/me`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponseDto {
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub photo_url: Option<String>,
    pub language_code: Option<String>,
    pub is_banned: bool,
    pub ban_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

impl From<User> for UserResponseDto {
    fn from(u: User) -> Self {
        Self {
            telegram_id: u.telegram_id,
            username: u.username,
            first_name: u.first_name,
            last_name: u.last_name,
            photo_url: u.photo_url,
            language_code: u.language_code,
            is_banned: u.is_banned,
            ban_reason: u.ban_reason,
            created_at: u.created_at,
            last_seen_at: u.last_seen_at,
        }
    }
}

/// Query params for the admin user list
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct UserListQuery {
    /// Only banned (true) or only active (false) users
    pub banned: Option<bool>,
    /// Case-insensitive match on username or names
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BanUserDto {
    #[validate(length(max = 500, message = "Reason must be at most 500 characters"))]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserBanResponseDto {
    pub id: i64,
    pub action: BanAction,
    pub reason: Option<String>,
    pub admin_id: i64,
    pub created_at: DateTime<Utc>,
}

impl From<UserBan> for UserBanResponseDto {
    fn from(b: UserBan) -> Self {
        Self {
            id: b.id,
            action: b.action,
            reason: b.reason,
            admin_id: b.admin_id,
            created_at: b.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateNoteDto {
    #[validate(length(min = 1, max = 2000, message = "Note must be 1-2000 characters"))]
    pub body: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserNoteResponseDto {
    pub id: i64,
    pub admin_id: i64,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserNote> for UserNoteResponseDto {
    fn from(n: UserNote) -> Self {
        Self {
            id: n.id,
            admin_id: n.admin_id,
            body: n.body,
            created_at: n.created_at,
        }
    }
}
