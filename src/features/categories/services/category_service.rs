use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::{
    CategoryResponseDto, CategoryTreeDto, CreateCategoryDto, UpdateCategoryDto,
};
use crate::features::categories::models::{Category, CategoryType};

const CATEGORY_COLUMNS: &str = r#"
    id, category_type, parent_id, title, slug, description, is_active, sort_order,
    created_at, updated_at
"#;

/// Service for category operations
pub struct CategoryService {
    pool: PgPool,
}

impl CategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, category_type: Option<CategoryType>, active_only: bool) -> Result<Vec<Category>> {
        let query = format!(
            r#"
            SELECT {}
            FROM categories
            WHERE ($1::category_type IS NULL OR category_type = $1)
              AND (NOT $2 OR is_active = TRUE)
            ORDER BY category_type, sort_order, title
            "#,
            CATEGORY_COLUMNS
        );

        sqlx::query_as::<_, Category>(&query)
            .bind(category_type)
            .bind(active_only)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list categories: {:?}", e);
                AppError::Database(e)
            })
    }

    /// List all active categories (flat list)
    pub async fn list(&self, category_type: Option<CategoryType>) -> Result<Vec<CategoryResponseDto>> {
        let categories = self.fetch(category_type, true).await?;
        Ok(categories.into_iter().map(|c| c.into()).collect())
    }

    /// List all active categories as tree structure
    pub async fn list_tree(&self, category_type: Option<CategoryType>) -> Result<Vec<CategoryTreeDto>> {
        let categories = self.fetch(category_type, true).await?;
        Ok(CategoryTreeDto::build_tree(categories))
    }

    /// List every category, active or not, for the admin panel
    pub async fn list_all(&self) -> Result<Vec<CategoryResponseDto>> {
        let categories = self.fetch(None, false).await?;
        Ok(categories.into_iter().map(|c| c.into()).collect())
    }

    /// Get an active category by slug. Slugs are unique per type, so without
    /// a type the product catalog wins over courses.
    pub async fn get_by_slug(
        &self,
        slug: &str,
        category_type: Option<CategoryType>,
    ) -> Result<CategoryResponseDto> {
        let query = format!(
            r#"
            SELECT {}
            FROM categories
            WHERE slug = $1 AND is_active = TRUE
              AND ($2::category_type IS NULL OR category_type = $2)
            ORDER BY category_type
            LIMIT 1
            "#,
            CATEGORY_COLUMNS
        );

        let category = sqlx::query_as::<_, Category>(&query)
            .bind(slug)
            .bind(category_type)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get category by slug: {:?}", e);
                AppError::Database(e)
            })?;

        category
            .map(|c| c.into())
            .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", slug)))
    }

    pub async fn get(&self, id: Uuid) -> Result<Category> {
        let query = format!("SELECT {} FROM categories WHERE id = $1", CATEGORY_COLUMNS);

        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get category {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))
    }

    pub async fn create(&self, dto: CreateCategoryDto) -> Result<CategoryResponseDto> {
        if let Some(parent_id) = dto.parent_id {
            self.check_parent(None, parent_id, dto.category_type).await?;
        }

        let query = format!(
            r#"
            INSERT INTO categories (id, category_type, parent_id, title, slug, description, is_active, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            CATEGORY_COLUMNS
        );

        let category = sqlx::query_as::<_, Category>(&query)
            .bind(Uuid::now_v7())
            .bind(dto.category_type)
            .bind(dto.parent_id)
            .bind(dto.title.trim())
            .bind(&dto.slug)
            .bind(&dto.description)
            .bind(dto.is_active)
            .bind(dto.sort_order)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::from_constraint(
                    e,
                    format!("Category slug '{}' already exists", dto.slug),
                )
            })?;

        tracing::info!("Category {} ({}) created", category.slug, category.category_type);
        Ok(category.into())
    }

    pub async fn update(&self, id: Uuid, dto: UpdateCategoryDto) -> Result<CategoryResponseDto> {
        let current = self.get(id).await?;

        let parent_id = if dto.clear_parent {
            None
        } else {
            dto.parent_id.or(current.parent_id)
        };
        if let Some(parent_id) = dto.parent_id.filter(|_| !dto.clear_parent) {
            self.check_parent(Some(id), parent_id, current.category_type)
                .await?;
        }

        let query = format!(
            r#"
            UPDATE categories SET
                parent_id = $2,
                title = COALESCE($3, title),
                slug = COALESCE($4, slug),
                description = COALESCE($5, description),
                is_active = COALESCE($6, is_active),
                sort_order = COALESCE($7, sort_order),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            CATEGORY_COLUMNS
        );

        let category = sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(parent_id)
            .bind(dto.title.as_deref().map(str::trim))
            .bind(&dto.slug)
            .bind(&dto.description)
            .bind(dto.is_active)
            .bind(dto.sort_order)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::from_constraint(e, "Category slug already exists"))?
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))?;

        Ok(category.into())
    }

    /// Delete a category. Fails with `Conflict` while products or
    /// subcategories still reference it.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::from_constraint(e, "Category is still used by products or subcategories")
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Category {} not found", id)));
        }

        tracing::info!("Category {} deleted", id);
        Ok(())
    }

    /// A parent must exist, share the category type and not be a descendant
    /// of the category being moved.
    async fn check_parent(
        &self,
        category_id: Option<Uuid>,
        parent_id: Uuid,
        category_type: CategoryType,
    ) -> Result<()> {
        let parent = self.get(parent_id).await.map_err(|e| match e {
            AppError::NotFound(_) => {
                AppError::Validation(format!("Parent category {} does not exist", parent_id))
            }
            other => other,
        })?;

        if parent.category_type != category_type {
            return Err(AppError::Validation(
                "Parent category must have the same type".to_string(),
            ));
        }

        let Some(category_id) = category_id else {
            return Ok(());
        };

        let creates_cycle: bool = sqlx::query_scalar(
            r#"
            WITH RECURSIVE ancestors AS (
                SELECT id, parent_id FROM categories WHERE id = $1
                UNION
                SELECT c.id, c.parent_id FROM categories c
                JOIN ancestors a ON c.id = a.parent_id
            )
            SELECT EXISTS (SELECT 1 FROM ancestors WHERE id = $2)
            "#,
        )
        .bind(parent_id)
        .bind(category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to walk category ancestors: {:?}", e);
            AppError::Database(e)
        })?;

        if creates_cycle {
            return Err(AppError::Validation(
                "A category cannot be nested under itself".to_string(),
            ));
        }
        Ok(())
    }
}
