use std::collections::HashMap;
use std::sync::Arc;

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::cart::services::load_reconciled;
use crate::features::orders::dtos::CreateOrderDto;
use crate::features::orders::models::{
    Order, OrderItem, OrderSource, OrderStatus, OrderWithItems,
};
use crate::features::orders::pricing::OrderDraft;
use crate::features::promocodes::services::{lock_and_evaluate, record_redemption};
use crate::features::users::UserService;

const ORDER_COLUMNS: &str = r#"
    id, number, user_id, status, subtotal, discount, total, promocode_id, promocode_code,
    customer_name, customer_phone, comment, source, created_at, updated_at
"#;

/// Service for checkout and order management
pub struct OrderService {
    pool: PgPool,
    users: Arc<UserService>,
}

impl OrderService {
    pub fn new(pool: PgPool, users: Arc<UserService>) -> Self {
        Self { pool, users }
    }

    /// Turn the reconciled cart into an order.
    ///
    /// Runs in one transaction: cart rows and the promocode row are locked,
    /// the promocode is re-validated and redeemed, items are snapshotted and
    /// the cart is emptied.
    pub async fn checkout(
        &self,
        user_id: i64,
        dto: CreateOrderDto,
        source: OrderSource,
    ) -> Result<OrderWithItems> {
        self.users.ensure_not_banned(user_id).await?;

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to start transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let cart = load_reconciled(&mut tx, user_id).await?;
        let mut draft = OrderDraft::from_cart(&cart)?;

        let code = dto
            .promocode
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());
        let promocode = match code {
            Some(code) => {
                let (promocode, discount) =
                    lock_and_evaluate(&mut tx, user_id, code, draft.subtotal).await?;
                draft.apply_discount(&discount);
                Some(promocode)
            }
            None => None,
        };

        let query = format!(
            r#"
            INSERT INTO orders (id, user_id, status, subtotal, discount, total, promocode_id,
                                promocode_code, customer_name, customer_phone, comment, source)
            VALUES ($1, $2, 'new', $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            ORDER_COLUMNS
        );
        let order = sqlx::query_as::<_, Order>(&query)
            .bind(Uuid::now_v7())
            .bind(user_id)
            .bind(draft.subtotal)
            .bind(draft.discount)
            .bind(draft.total)
            .bind(promocode.as_ref().map(|p| p.id))
            .bind(promocode.as_ref().map(|p| p.code.clone()))
            .bind(trimmed(&dto.customer_name))
            .bind(trimmed(&dto.customer_phone))
            .bind(trimmed(&dto.comment))
            .bind(source)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert order for user {}: {:?}", user_id, e);
                AppError::Database(e)
            })?;

        let mut items = Vec::with_capacity(draft.items.len());
        for line in &draft.items {
            let item = sqlx::query_as::<_, OrderItem>(
                r#"
                INSERT INTO order_items (order_id, product_id, product_type, title, unit_price,
                                         quantity, line_total)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id, order_id, product_id, product_type, title, unit_price, quantity,
                          line_total
                "#,
            )
            .bind(order.id)
            .bind(line.product_id)
            .bind(line.product_type)
            .bind(&line.title)
            .bind(line.unit_price)
            .bind(line.quantity)
            .bind(line.line_total)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert order item: {:?}", e);
                AppError::Database(e)
            })?;
            items.push(item);
        }

        if let Some(promocode) = &promocode {
            record_redemption(&mut tx, promocode.id, user_id, order.id).await?;
        }

        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to clear cart after checkout: {:?}", e);
                AppError::Database(e)
            })?;

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit checkout: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Order #{} created for user {} via {:?}: subtotal={}, discount={}, total={}",
            order.number,
            user_id,
            source,
            order.subtotal,
            order.discount,
            order.total
        );

        Ok(OrderWithItems { order, items })
    }

    /// Orders of one user, newest first
    pub async fn list_for_user(
        &self,
        user_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<OrderWithItems>, i64)> {
        self.list_where(Some(user_id), None, offset, limit).await
    }

    /// Fetch an order owned by the user; other users' orders are 404
    pub async fn get_for_user(&self, user_id: i64, id: Uuid) -> Result<OrderWithItems> {
        let order = self.get(id).await?;
        if order.order.user_id != user_id {
            return Err(AppError::NotFound(format!("Order {} not found", id)));
        }
        Ok(order)
    }

    /// All orders, optionally filtered by status
    pub async fn list_all(
        &self,
        status: Option<OrderStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<OrderWithItems>, i64)> {
        self.list_where(None, status, offset, limit).await
    }

    pub async fn get(&self, id: Uuid) -> Result<OrderWithItems> {
        let query = format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS);
        let order = sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get order {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Order {} not found", id)))?;

        let mut conn = self.pool.acquire().await.map_err(|e| {
            tracing::error!("Failed to acquire connection: {:?}", e);
            AppError::Database(e)
        })?;
        let mut with_items = attach_items(&mut conn, vec![order]).await?;
        with_items
            .pop()
            .ok_or_else(|| AppError::Internal("Order vanished while loading items".to_string()))
    }

    /// Move an order along its lifecycle. Cancelling gives the promocode use
    /// back.
    pub async fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<OrderWithItems> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to start transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let query = format!("SELECT {} FROM orders WHERE id = $1 FOR UPDATE", ORDER_COLUMNS);
        let current = sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to lock order {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Order {} not found", id)))?;

        if !current.status.can_transition_to(status) {
            return Err(AppError::BadRequest(format!(
                "Cannot change order status from {} to {}",
                current.status, status
            )));
        }

        sqlx::query("UPDATE orders SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update order {} status: {:?}", id, e);
                AppError::Database(e)
            })?;

        if status == OrderStatus::Cancelled {
            if let Some(promocode_id) = current.promocode_id {
                release_redemption(&mut tx, promocode_id, id).await?;
            }
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit order status change: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Order #{} status {} -> {}",
            current.number,
            current.status,
            status
        );
        self.get(id).await
    }

    async fn list_where(
        &self,
        user_id: Option<i64>,
        status: Option<OrderStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<OrderWithItems>, i64)> {
        let filter = r#"
            WHERE ($1::bigint IS NULL OR user_id = $1)
              AND ($2::order_status IS NULL OR status = $2)
        "#;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM orders {}", filter))
            .bind(user_id)
            .bind(status)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count orders: {:?}", e);
                AppError::Database(e)
            })?;

        let query = format!(
            "SELECT {} FROM orders {} ORDER BY created_at DESC, number DESC LIMIT $3 OFFSET $4",
            ORDER_COLUMNS, filter
        );
        let orders = sqlx::query_as::<_, Order>(&query)
            .bind(user_id)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list orders: {:?}", e);
                AppError::Database(e)
            })?;

        let mut conn = self.pool.acquire().await.map_err(|e| {
            tracing::error!("Failed to acquire connection: {:?}", e);
            AppError::Database(e)
        })?;
        let orders = attach_items(&mut conn, orders).await?;

        Ok((orders, total))
    }
}

async fn attach_items(conn: &mut PgConnection, orders: Vec<Order>) -> Result<Vec<OrderWithItems>> {
    if orders.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let items = sqlx::query_as::<_, OrderItem>(
        r#"
        SELECT id, order_id, product_id, product_type, title, unit_price, quantity, line_total
        FROM order_items
        WHERE order_id = ANY($1)
        ORDER BY id
        "#,
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| {
        tracing::error!("Failed to load order items: {:?}", e);
        AppError::Database(e)
    })?;

    let mut by_order: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
    for item in items {
        by_order.entry(item.order_id).or_default().push(item);
    }

    Ok(orders
        .into_iter()
        .map(|order| {
            let items = by_order.remove(&order.id).unwrap_or_default();
            OrderWithItems { order, items }
        })
        .collect())
}

async fn release_redemption(conn: &mut PgConnection, promocode_id: Uuid, order_id: Uuid) -> Result<()> {
    let released = sqlx::query("DELETE FROM promocode_usages WHERE promocode_id = $1 AND order_id = $2")
        .bind(promocode_id)
        .bind(order_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            tracing::error!("Failed to release promocode usage: {:?}", e);
            AppError::Database(e)
        })?;

    if released.rows_affected() > 0 {
        sqlx::query(
            r#"
            UPDATE promocodes SET used_count = GREATEST(used_count - 1, 0), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(promocode_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            tracing::error!("Failed to give back promocode use: {:?}", e);
            AppError::Database(e)
        })?;
        tracing::info!("Promocode {} use released by cancelled order {}", promocode_id, order_id);
    }
    Ok(())
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trimmed_drops_blank_values() {
        assert_eq!(trimmed(&Some("  Ann ".to_string())), Some("Ann".to_string()));
        assert_eq!(trimmed(&Some("   ".to_string())), None);
        assert_eq!(trimmed(&None), None);
    }
}
