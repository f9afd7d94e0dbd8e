use std::sync::Arc;

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::cart::models::CartRow;
use crate::features::cart::reconcile::{reconcile, Reconciled};
use crate::features::products::ProductService;
use crate::shared::constants::MAX_CART_QUANTITY;

/// Load the user's cart, reconcile it and delete dropped rows on the given
/// connection. Callers own the transaction.
pub async fn load_reconciled(conn: &mut PgConnection, user_id: i64) -> Result<Reconciled> {
    let rows = sqlx::query_as::<_, CartRow>(
        r#"
        SELECT ci.product_id, ci.item_type, ci.quantity,
               p.title, p.price, p.image_url, p.is_active,
               c.title AS category_title
        FROM cart_items ci
        LEFT JOIN products p ON p.id = ci.product_id
        LEFT JOIN categories c ON c.id = p.category_id
        WHERE ci.user_id = $1
        ORDER BY ci.created_at, ci.product_id
        FOR UPDATE OF ci
        "#,
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| {
        tracing::error!("Failed to load cart for user {}: {:?}", user_id, e);
        AppError::Database(e)
    })?;

    let reconciled = reconcile(rows);

    if !reconciled.removed.is_empty() {
        sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND product_id = ANY($2)")
            .bind(user_id)
            .bind(&reconciled.removed)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                tracing::error!("Failed to drop stale cart rows for user {}: {:?}", user_id, e);
                AppError::Database(e)
            })?;
        tracing::info!(
            "Dropped {} unavailable products from cart of user {}",
            reconciled.removed.len(),
            user_id
        );
    }

    Ok(reconciled)
}

/// Service for shopping carts
pub struct CartService {
    pool: PgPool,
    products: Arc<ProductService>,
}

impl CartService {
    pub fn new(pool: PgPool, products: Arc<ProductService>) -> Self {
        Self { pool, products }
    }

    /// Reconciled cart of a user
    pub async fn get(&self, user_id: i64) -> Result<Reconciled> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to start transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let reconciled = load_reconciled(&mut tx, user_id).await?;

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit cart reconciliation: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(reconciled)
    }

    /// Add units of an active product, merging with an existing line.
    /// The line quantity saturates at the cart maximum.
    pub async fn add(&self, user_id: i64, product_id: Uuid, quantity: i32) -> Result<Reconciled> {
        if quantity < 1 {
            return Err(AppError::Validation("Quantity must be positive".to_string()));
        }
        let product = self.products.get_active(product_id).await?;

        sqlx::query(
            r#"
            INSERT INTO cart_items (user_id, product_id, item_type, quantity)
            VALUES ($1, $2, $3, LEAST($4, $5))
            ON CONFLICT (user_id, product_id, item_type) DO UPDATE
            SET quantity = LEAST(cart_items.quantity + EXCLUDED.quantity, $5),
                updated_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(product.id)
        .bind(product.product_type)
        .bind(quantity)
        .bind(MAX_CART_QUANTITY)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to add product {} to cart: {:?}", product_id, e);
            AppError::Database(e)
        })?;

        self.get(user_id).await
    }

    /// Set the quantity of an existing line; 0 removes it
    pub async fn set_quantity(
        &self,
        user_id: i64,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<Reconciled> {
        if !(0..=MAX_CART_QUANTITY).contains(&quantity) {
            return Err(AppError::Validation(format!(
                "Quantity must be 0-{}",
                MAX_CART_QUANTITY
            )));
        }
        if quantity == 0 {
            return self.remove(user_id, product_id).await;
        }

        let result = sqlx::query(
            r#"
            UPDATE cart_items SET quantity = $3, updated_at = NOW()
            WHERE user_id = $1 AND product_id = $2
            "#,
        )
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update cart line {}: {:?}", product_id, e);
            AppError::Database(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Product {} is not in the cart",
                product_id
            )));
        }

        self.get(user_id).await
    }

    /// Take one unit off a line, deleting it when it reaches zero
    pub async fn decrement(&self, user_id: i64, product_id: Uuid) -> Result<Reconciled> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to start transaction: {:?}", e);
            AppError::Database(e)
        })?;

        sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND product_id = $2 AND quantity <= 1")
            .bind(user_id)
            .bind(product_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to drop last unit of cart line {}: {:?}", product_id, e);
                AppError::Database(e)
            })?;

        sqlx::query(
            r#"
            UPDATE cart_items SET quantity = quantity - 1, updated_at = NOW()
            WHERE user_id = $1 AND product_id = $2 AND quantity > 1
            "#,
        )
        .bind(user_id)
        .bind(product_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to decrement cart line {}: {:?}", product_id, e);
            AppError::Database(e)
        })?;

        let reconciled = load_reconciled(&mut tx, user_id).await?;

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit cart update: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(reconciled)
    }

    /// Remove a line. Removing an absent line is not an error.
    pub async fn remove(&self, user_id: i64, product_id: Uuid) -> Result<Reconciled> {
        sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND product_id = $2")
            .bind(user_id)
            .bind(product_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to remove cart line {}: {:?}", product_id, e);
                AppError::Database(e)
            })?;

        self.get(user_id).await
    }

    pub async fn clear(&self, user_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to clear cart of user {}: {:?}", user_id, e);
                AppError::Database(e)
            })?;
        Ok(())
    }
}
