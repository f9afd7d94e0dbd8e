use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

/// Database model for a Telegram user
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub photo_url: Option<String>,
    pub language_code: Option<String>,
    pub is_banned: bool,
    pub ban_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

impl User {
    /// Name to greet the user with
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name, &self.username) {
            (Some(first), Some(last), _) => format!("{} {}", first, last),
            (Some(first), None, _) => first.clone(),
            (None, _, Some(username)) => format!("@{}", username),
            _ => format!("user {}", self.telegram_id),
        }
    }
}

/// Ban history action matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "ban_action", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BanAction {
    Ban,
    Unban,
}

/// Ban history entry
#[derive(Debug, Clone, FromRow)]
pub struct UserBan {
    pub id: i64,
    pub user_id: i64,
    pub action: BanAction,
    pub reason: Option<String>,
    pub admin_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Admin-authored note, append-only
#[derive(Debug, Clone, FromRow)]
pub struct UserNote {
    pub id: i64,
    pub user_id: i64,
    pub admin_id: i64,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: Option<&str>, last: Option<&str>, username: Option<&str>) -> User {
        let now = Utc::now();
        User {
            telegram_id: 7,
            username: username.map(String::from),
            first_name: first.map(String::from),
            last_name: last.map(String::from),
            photo_url: None,
            language_code: None,
            is_banned: false,
            ban_reason: None,
            created_at: now,
            updated_at: now,
            last_seen_at: now,
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(user(Some("Ann"), Some("Lee"), None).display_name(), "Ann Lee");
        assert_eq!(user(Some("Ann"), None, Some("ann")).display_name(), "Ann");
        assert_eq!(user(None, None, Some("ann")).display_name(), "@ann");
        assert_eq!(user(None, None, None).display_name(), "user 7");
    }
}
