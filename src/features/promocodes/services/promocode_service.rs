use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::cart::CartService;
use crate::features::promocodes::dtos::{check_terms, CreatePromocodeDto, UpdatePromocodeDto};
use crate::features::promocodes::models::Promocode;
use crate::features::promocodes::rules::{self, Discount, Rejection};
use crate::shared::validation::normalize_promocode;

const PROMOCODE_COLUMNS: &str = r#"
    id, code, discount_type, value, min_order_total, max_uses, used_count,
    is_active, valid_from, valid_until, created_at, updated_at
"#;

/// Service for promocode checks, redemption and administration
pub struct PromocodeService {
    pool: PgPool,
    cart: Arc<CartService>,
}

impl PromocodeService {
    pub fn new(pool: PgPool, cart: Arc<CartService>) -> Self {
        Self { pool, cart }
    }

    /// Price a code against `total`, or the reconciled cart total when absent.
    /// Nothing is redeemed.
    pub async fn check(&self, user_id: i64, code: &str, total: Option<Decimal>) -> Result<Discount> {
        let total = match total {
            Some(total) if total.is_sign_negative() => {
                return Err(AppError::Validation("Total cannot be negative".to_string()))
            }
            Some(total) => total,
            None => self.cart.get(user_id).await?.total(),
        };

        let mut conn = self.pool.acquire().await.map_err(|e| {
            tracing::error!("Failed to acquire connection: {:?}", e);
            AppError::Database(e)
        })?;

        let promo = find_by_code(&mut conn, code, false)
            .await?
            .ok_or(Rejection::NotFound)?;
        let already_used = has_redeemed(&mut conn, promo.id, user_id).await?;

        Ok(rules::evaluate(&promo, total, already_used, Utc::now())?)
    }

    pub async fn list(&self, offset: i64, limit: i64) -> Result<(Vec<Promocode>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM promocodes")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count promocodes: {:?}", e);
                AppError::Database(e)
            })?;

        let query = format!(
            "SELECT {} FROM promocodes ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            PROMOCODE_COLUMNS
        );
        let promocodes = sqlx::query_as::<_, Promocode>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list promocodes: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((promocodes, total))
    }

    pub async fn get(&self, id: Uuid) -> Result<Promocode> {
        let query = format!("SELECT {} FROM promocodes WHERE id = $1", PROMOCODE_COLUMNS);

        sqlx::query_as::<_, Promocode>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get promocode {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Promocode {} not found", id)))
    }

    pub async fn create(&self, dto: CreatePromocodeDto) -> Result<Promocode> {
        let code = normalize_promocode(&dto.code);
        let query = format!(
            r#"
            INSERT INTO promocodes (id, code, discount_type, value, min_order_total, max_uses,
                                    is_active, valid_from, valid_until)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            PROMOCODE_COLUMNS
        );

        let promo = sqlx::query_as::<_, Promocode>(&query)
            .bind(Uuid::now_v7())
            .bind(&code)
            .bind(dto.discount_type)
            .bind(dto.value)
            .bind(dto.min_order_total)
            .bind(dto.max_uses)
            .bind(dto.is_active)
            .bind(dto.valid_from)
            .bind(dto.valid_until)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::from_constraint(e, format!("Promocode '{}' already exists", code)))?;

        tracing::info!("Promocode {} created", promo.code);
        Ok(promo)
    }

    pub async fn update(&self, id: Uuid, dto: UpdatePromocodeDto) -> Result<Promocode> {
        let current = self.get(id).await?;

        let discount_type = dto.discount_type.unwrap_or(current.discount_type);
        let value = dto.value.unwrap_or(current.value);
        let min_order_total = dto.min_order_total.unwrap_or(current.min_order_total);
        let max_uses = dto.max_uses.unwrap_or(current.max_uses);
        let (valid_from, valid_until) = dto.merged_window(current.valid_from, current.valid_until);

        check_terms(discount_type, value, min_order_total, valid_from, valid_until).map_err(
            |e| {
                AppError::Validation(
                    e.message
                        .map(|m| m.into_owned())
                        .unwrap_or_else(|| e.code.into_owned()),
                )
            },
        )?;
        if max_uses != 0 && max_uses < current.used_count {
            return Err(AppError::Validation(format!(
                "max_uses cannot be below the {} redemptions already made",
                current.used_count
            )));
        }

        let query = format!(
            r#"
            UPDATE promocodes SET
                discount_type = $2,
                value = $3,
                min_order_total = $4,
                max_uses = $5,
                is_active = COALESCE($6, is_active),
                valid_from = $7,
                valid_until = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PROMOCODE_COLUMNS
        );

        sqlx::query_as::<_, Promocode>(&query)
            .bind(id)
            .bind(discount_type)
            .bind(value)
            .bind(min_order_total)
            .bind(max_uses)
            .bind(dto.is_active)
            .bind(valid_from)
            .bind(valid_until)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::from_constraint(e, "Promocode terms conflict with its usage"))?
            .ok_or_else(|| AppError::NotFound(format!("Promocode {} not found", id)))
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM promocodes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete promocode {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Promocode {} not found", id)));
        }

        tracing::info!("Promocode {} deleted", id);
        Ok(())
    }
}

/// Look a code up case-insensitively. With `lock`, the row stays locked
/// until the surrounding transaction ends.
pub async fn find_by_code(
    conn: &mut PgConnection,
    code: &str,
    lock: bool,
) -> Result<Option<Promocode>> {
    let query = format!(
        "SELECT {} FROM promocodes WHERE code = $1 {}",
        PROMOCODE_COLUMNS,
        if lock { "FOR UPDATE" } else { "" }
    );

    sqlx::query_as::<_, Promocode>(&query)
        .bind(normalize_promocode(code))
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up promocode: {:?}", e);
            AppError::Database(e)
        })
}

async fn has_redeemed(conn: &mut PgConnection, promocode_id: Uuid, user_id: i64) -> Result<bool> {
    sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM promocode_usages WHERE promocode_id = $1 AND user_id = $2)",
    )
    .bind(promocode_id)
    .bind(user_id)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| {
        tracing::error!("Failed to check promocode usage: {:?}", e);
        AppError::Database(e)
    })
}

/// Lock the promocode row and re-run every rule inside the caller's
/// transaction. Concurrent checkouts with the same code queue on the lock.
pub async fn lock_and_evaluate(
    conn: &mut PgConnection,
    user_id: i64,
    code: &str,
    total: Decimal,
) -> Result<(Promocode, Discount)> {
    let promo = find_by_code(conn, code, true)
        .await?
        .ok_or(Rejection::NotFound)?;
    let already_used = has_redeemed(conn, promo.id, user_id).await?;
    let discount = rules::evaluate(&promo, total, already_used, Utc::now())?;
    Ok((promo, discount))
}

/// Consume one use of the promocode for an order. The conditional update
/// and the unique usage index both turn a lost race into `Conflict`.
pub async fn record_redemption(
    conn: &mut PgConnection,
    promocode_id: Uuid,
    user_id: i64,
    order_id: Uuid,
) -> Result<()> {
    let updated = sqlx::query(
        r#"
        UPDATE promocodes
        SET used_count = used_count + 1, updated_at = NOW()
        WHERE id = $1 AND (max_uses = 0 OR used_count < max_uses)
        "#,
    )
    .bind(promocode_id)
    .execute(&mut *conn)
    .await
    .map_err(|e| AppError::from_constraint(e, "Promocode usage limit reached"))?;

    rules::ensure_use_claimed(updated.rows_affected())?;

    sqlx::query(
        "INSERT INTO promocode_usages (promocode_id, user_id, order_id) VALUES ($1, $2, $3)",
    )
    .bind(promocode_id)
    .bind(user_id)
    .bind(order_id)
    .execute(&mut *conn)
    .await
    .map_err(|e| AppError::from_constraint(e, "Promocode has already been used"))?;

    tracing::info!("Promocode {} redeemed by user {}", promocode_id, user_id);
    Ok(())
}
