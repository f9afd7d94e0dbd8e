use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::auth::telegram::TelegramUserData;
use crate::features::users::models::{BanAction, User, UserBan, UserNote};

const USER_COLUMNS: &str = r#"
    telegram_id, username, first_name, last_name, photo_url, language_code,
    is_banned, ban_reason, created_at, updated_at, last_seen_at
"#;

/// Service for Telegram users, bans and admin notes
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the user on first contact, refresh profile fields afterwards
    pub async fn upsert_from_telegram(&self, data: &TelegramUserData) -> Result<User> {
        let query = format!(
            r#"
            INSERT INTO users (telegram_id, username, first_name, last_name, photo_url, language_code)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (telegram_id) DO UPDATE SET
                username = EXCLUDED.username,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                photo_url = COALESCE(EXCLUDED.photo_url, users.photo_url),
                language_code = COALESCE(EXCLUDED.language_code, users.language_code),
                last_seen_at = NOW(),
                updated_at = NOW()
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&query)
            .bind(data.id)
            .bind(&data.username)
            .bind(&data.first_name)
            .bind(&data.last_name)
            .bind(&data.photo_url)
            .bind(&data.language_code)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to upsert user {}: {:?}", data.id, e);
                AppError::Database(e)
            })
    }

    pub async fn get(&self, telegram_id: i64) -> Result<User> {
        let query = format!("SELECT {} FROM users WHERE telegram_id = $1", USER_COLUMNS);

        sqlx::query_as::<_, User>(&query)
            .bind(telegram_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch user {}: {:?}", telegram_id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", telegram_id)))
    }

    /// Fail with `Forbidden` when the user is banned. Unknown users pass.
    pub async fn ensure_not_banned(&self, telegram_id: i64) -> Result<()> {
        let banned: Option<(bool, Option<String>)> =
            sqlx::query_as("SELECT is_banned, ban_reason FROM users WHERE telegram_id = $1")
                .bind(telegram_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to check ban for user {}: {:?}", telegram_id, e);
                    AppError::Database(e)
                })?;

        match banned {
            Some((true, reason)) => Err(AppError::Forbidden(match reason {
                Some(reason) => format!("User is banned: {}", reason),
                None => "User is banned".to_string(),
            })),
            _ => Ok(()),
        }
    }

    /// List users, newest first, with total count
    pub async fn list(
        &self,
        banned: Option<bool>,
        search: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<User>, i64)> {
        let pattern = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s.to_lowercase()));

        let filter = r#"
            WHERE ($1::bool IS NULL OR is_banned = $1)
              AND ($2::text IS NULL
                   OR LOWER(COALESCE(username, '')) LIKE $2
                   OR LOWER(COALESCE(first_name, '')) LIKE $2
                   OR LOWER(COALESCE(last_name, '')) LIKE $2)
        "#;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM users {}", filter))
            .bind(banned)
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count users: {:?}", e);
                AppError::Database(e)
            })?;

        let query = format!(
            "SELECT {} FROM users {} ORDER BY created_at DESC LIMIT $3 OFFSET $4",
            USER_COLUMNS, filter
        );
        let users = sqlx::query_as::<_, User>(&query)
            .bind(banned)
            .bind(&pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list users: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((users, total))
    }

    /// Ban a user and record the action in the ban history
    pub async fn ban(&self, telegram_id: i64, reason: Option<&str>, admin_id: i64) -> Result<User> {
        if telegram_id == admin_id {
            return Err(AppError::BadRequest("Admins cannot ban themselves".to_string()));
        }
        self.set_banned(telegram_id, BanAction::Ban, reason, admin_id).await
    }

    /// Lift a ban and record the action in the ban history
    pub async fn unban(&self, telegram_id: i64, admin_id: i64) -> Result<User> {
        self.set_banned(telegram_id, BanAction::Unban, None, admin_id).await
    }

    async fn set_banned(
        &self,
        telegram_id: i64,
        action: BanAction,
        reason: Option<&str>,
        admin_id: i64,
    ) -> Result<User> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to start transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let is_banned = action == BanAction::Ban;
        let query = format!(
            r#"
            UPDATE users SET is_banned = $2, ban_reason = $3, updated_at = NOW()
            WHERE telegram_id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(telegram_id)
            .bind(is_banned)
            .bind(if is_banned { reason } else { None })
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update ban state for {}: {:?}", telegram_id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", telegram_id)))?;

        sqlx::query(
            "INSERT INTO user_bans (user_id, action, reason, admin_id) VALUES ($1, $2, $3, $4)",
        )
        .bind(telegram_id)
        .bind(action)
        .bind(reason)
        .bind(admin_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to record ban history for {}: {:?}", telegram_id, e);
            AppError::Database(e)
        })?;

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit ban change: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "User {} {:?} by admin {}",
            telegram_id,
            action,
            admin_id
        );
        Ok(user)
    }

    pub async fn list_bans(&self, telegram_id: i64) -> Result<Vec<UserBan>> {
        self.get(telegram_id).await?;

        sqlx::query_as::<_, UserBan>(
            r#"
            SELECT id, user_id, action, reason, admin_id, created_at
            FROM user_bans
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(telegram_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list bans for {}: {:?}", telegram_id, e);
            AppError::Database(e)
        })
    }

    pub async fn add_note(&self, telegram_id: i64, admin_id: i64, body: &str) -> Result<UserNote> {
        self.get(telegram_id).await?;

        sqlx::query_as::<_, UserNote>(
            r#"
            INSERT INTO user_notes (user_id, admin_id, body)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, admin_id, body, created_at
            "#,
        )
        .bind(telegram_id)
        .bind(admin_id)
        .bind(body.trim())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to add note for {}: {:?}", telegram_id, e);
            AppError::Database(e)
        })
    }

    pub async fn list_notes(&self, telegram_id: i64) -> Result<Vec<UserNote>> {
        self.get(telegram_id).await?;

        sqlx::query_as::<_, UserNote>(
            r#"
            SELECT id, user_id, admin_id, body, created_at
            FROM user_notes
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(telegram_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list notes for {}: {:?}", telegram_id, e);
            AppError::Database(e)
        })
    }
}
