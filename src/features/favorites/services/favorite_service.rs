use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::cart::models::CartRow;
use crate::features::cart::reconcile::{reconcile, Reconciled};
use crate::features::products::ProductService;

/// Service for favorite products
pub struct FavoriteService {
    pool: PgPool,
    products: Arc<ProductService>,
}

impl FavoriteService {
    pub fn new(pool: PgPool, products: Arc<ProductService>) -> Self {
        Self { pool, products }
    }

    /// Favorites reconciled the same way as the cart
    pub async fn list(&self, user_id: i64) -> Result<Reconciled> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to start transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let rows = sqlx::query_as::<_, CartRow>(
            r#"
            SELECT f.product_id, f.item_type, 1 AS quantity,
                   p.title, p.price, p.image_url, p.is_active,
                   c.title AS category_title
            FROM favorites f
            LEFT JOIN products p ON p.id = f.product_id
            LEFT JOIN categories c ON c.id = p.category_id
            WHERE f.user_id = $1
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load favorites for user {}: {:?}", user_id, e);
            AppError::Database(e)
        })?;

        let reconciled = reconcile(rows);

        if !reconciled.removed.is_empty() {
            sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND product_id = ANY($2)")
                .bind(user_id)
                .bind(&reconciled.removed)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to drop stale favorites: {:?}", e);
                    AppError::Database(e)
                })?;
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit favorites reconciliation: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(reconciled)
    }

    /// Idempotent: adding an existing favorite is a no-op
    pub async fn add(&self, user_id: i64, product_id: Uuid) -> Result<Reconciled> {
        let product = self.products.get_active(product_id).await?;

        sqlx::query(
            r#"
            INSERT INTO favorites (user_id, product_id, item_type)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, product_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(product.id)
        .bind(product.product_type)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to add favorite {}: {:?}", product_id, e);
            AppError::Database(e)
        })?;

        self.list(user_id).await
    }

    pub async fn remove(&self, user_id: i64, product_id: Uuid) -> Result<Reconciled> {
        sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND product_id = $2")
            .bind(user_id)
            .bind(product_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to remove favorite {}: {:?}", product_id, e);
                AppError::Database(e)
            })?;

        self.list(user_id).await
    }
}
