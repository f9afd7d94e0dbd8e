use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::CategoryService;
use crate::features::products::dtos::{CreateProductDto, UpdateProductDto};
use crate::features::products::models::{Product, ProductType};

const PRODUCT_SELECT: &str = r#"
    SELECT p.id, p.product_type, p.title, p.description, p.price, p.image_url,
           p.is_active, p.category_id, c.title AS category_title, p.sort_order,
           p.created_at, p.updated_at
    FROM products p
    LEFT JOIN categories c ON c.id = p.category_id
"#;

/// Service for catalog products
pub struct ProductService {
    pool: PgPool,
    categories: Arc<CategoryService>,
}

impl ProductService {
    pub fn new(pool: PgPool, categories: Arc<CategoryService>) -> Self {
        Self { pool, categories }
    }

    /// Paginated listing ordered by sort_order then title
    pub async fn list(
        &self,
        product_type: Option<ProductType>,
        category_id: Option<Uuid>,
        active_only: bool,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Product>, i64)> {
        let filter = r#"
            WHERE ($1::product_type IS NULL OR p.product_type = $1)
              AND ($2::uuid IS NULL OR p.category_id = $2)
              AND (NOT $3 OR p.is_active = TRUE)
        "#;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM products p {}", filter))
            .bind(product_type)
            .bind(category_id)
            .bind(active_only)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count products: {:?}", e);
                AppError::Database(e)
            })?;

        let query = format!(
            "{} {} ORDER BY p.sort_order, p.title, p.id LIMIT $4 OFFSET $5",
            PRODUCT_SELECT, filter
        );
        let products = sqlx::query_as::<_, Product>(&query)
            .bind(product_type)
            .bind(category_id)
            .bind(active_only)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list products: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((products, total))
    }

    /// Get a product regardless of its active flag
    pub async fn get(&self, id: Uuid) -> Result<Product> {
        let query = format!("{} WHERE p.id = $1", PRODUCT_SELECT);

        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get product {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))
    }

    /// Get a product visible to shoppers
    pub async fn get_active(&self, id: Uuid) -> Result<Product> {
        let product = self.get(id).await?;
        if !product.is_active {
            return Err(AppError::NotFound(format!("Product {} not found", id)));
        }
        Ok(product)
    }

    pub async fn create(&self, dto: CreateProductDto) -> Result<Product> {
        if let Some(category_id) = dto.category_id {
            self.check_category(category_id, dto.product_type).await?;
        }

        let id = Uuid::now_v7();
        sqlx::query(
            r#"
            INSERT INTO products (id, product_type, title, description, price, image_url,
                                  is_active, category_id, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(id)
        .bind(dto.product_type)
        .bind(dto.title.trim())
        .bind(&dto.description)
        .bind(dto.price)
        .bind(&dto.image_url)
        .bind(dto.is_active)
        .bind(dto.category_id)
        .bind(dto.sort_order)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from_constraint(e, "Product violates a catalog constraint"))?;

        tracing::info!("Product {} ({}) created", id, dto.product_type);
        self.get(id).await
    }

    pub async fn update(&self, id: Uuid, dto: UpdateProductDto) -> Result<Product> {
        let current = self.get(id).await?;

        let category_id = if dto.clear_category {
            None
        } else {
            dto.category_id.or(current.category_id)
        };
        if let Some(category_id) = dto.category_id.filter(|_| !dto.clear_category) {
            self.check_category(category_id, current.product_type).await?;
        }

        sqlx::query(
            r#"
            UPDATE products SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                image_url = COALESCE($5, image_url),
                category_id = $6,
                is_active = COALESCE($7, is_active),
                sort_order = COALESCE($8, sort_order),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(dto.title.as_deref().map(str::trim))
        .bind(&dto.description)
        .bind(dto.price)
        .bind(&dto.image_url)
        .bind(category_id)
        .bind(dto.is_active)
        .bind(dto.sort_order)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from_constraint(e, "Product violates a catalog constraint"))?;

        self.get(id).await
    }

    /// Flip the active flag. Inactive products vanish from carts and
    /// favorites on their next read.
    pub async fn toggle(&self, id: Uuid) -> Result<Product> {
        let result = sqlx::query(
            "UPDATE products SET is_active = NOT is_active, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to toggle product {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Product {} not found", id)));
        }

        let product = self.get(id).await?;
        tracing::info!("Product {} is_active={}", id, product.is_active);
        Ok(product)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete product {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Product {} not found", id)));
        }

        tracing::info!("Product {} deleted", id);
        Ok(())
    }

    async fn check_category(&self, category_id: Uuid, product_type: ProductType) -> Result<()> {
        let category = self.categories.get(category_id).await.map_err(|e| match e {
            AppError::NotFound(_) => {
                AppError::Validation(format!("Category {} does not exist", category_id))
            }
            other => other,
        })?;

        if category.category_type != product_type.category_type() {
            return Err(AppError::Validation(format!(
                "A {} cannot be filed under a {} category",
                product_type, category.category_type
            )));
        }
        Ok(())
    }
}
