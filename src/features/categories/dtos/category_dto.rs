use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::models::{Category, CategoryType};
use crate::shared::validation::SLUG_REGEX;

/// Query params for listing categories
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListCategoriesQuery {
    /// Restrict to one catalog
    #[serde(rename = "type")]
    pub category_type: Option<CategoryType>,

    /// If true, return tree structure. Default: false (flat list)
    #[serde(default)]
    pub tree: bool,
}

/// Query params for a slug lookup
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct CategoryTypeQuery {
    #[serde(rename = "type")]
    pub category_type: Option<CategoryType>,
}

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: Uuid,
    pub category_type: CategoryType,
    pub parent_id: Option<Uuid>,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            category_type: c.category_type,
            parent_id: c.parent_id,
            title: c.title,
            slug: c.slug,
            description: c.description,
            is_active: c.is_active,
            sort_order: c.sort_order,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Response DTO for category tree (hierarchical structure)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(no_recursion)]
pub struct CategoryTreeDto {
    pub id: Uuid,
    pub category_type: CategoryType,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub sort_order: i32,
    pub children: Vec<CategoryTreeDto>,
}

impl CategoryTreeDto {
    /// Build tree from a flat, already ordered list of categories.
    ///
    /// Categories whose parent is missing from the list are promoted to roots.
    pub fn build_tree(categories: Vec<Category>) -> Vec<CategoryTreeDto> {
        let is_root = |c: &Category| match c.parent_id {
            None => true,
            Some(parent) => !categories.iter().any(|p| p.id == parent),
        };

        categories
            .iter()
            .filter(|c| is_root(c))
            .map(|root| Self::build_node(root, &categories))
            .collect()
    }

    fn build_node(category: &Category, all_categories: &[Category]) -> CategoryTreeDto {
        let children: Vec<CategoryTreeDto> = all_categories
            .iter()
            .filter(|c| c.parent_id == Some(category.id) && c.id != category.id)
            .map(|child| Self::build_node(child, all_categories))
            .collect();

        CategoryTreeDto {
            id: category.id,
            category_type: category.category_type,
            title: category.title.clone(),
            slug: category.slug.clone(),
            description: category.description.clone(),
            sort_order: category.sort_order,
            children,
        }
    }
}

/// Flat list or tree, depending on `?tree=`
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(untagged)]
pub enum CategoryListing {
    Flat(Vec<CategoryResponseDto>),
    Tree(Vec<CategoryTreeDto>),
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryDto {
    pub category_type: CategoryType,

    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(
        length(min = 1, max = 100, message = "Slug must be 1-100 characters"),
        regex(path = *SLUG_REGEX, message = "Slug must be lowercase letters, digits and hyphens")
    )]
    pub slug: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    pub parent_id: Option<Uuid>,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[serde(default)]
    pub sort_order: i32,
}

/// Partial update, absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryDto {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(
        length(min = 1, max = 100, message = "Slug must be 1-100 characters"),
        regex(path = *SLUG_REGEX, message = "Slug must be lowercase letters, digits and hyphens")
    )]
    pub slug: Option<String>,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    pub parent_id: Option<Uuid>,

    /// Detach from the current parent
    #[serde(default)]
    pub clear_parent: bool,

    pub is_active: Option<bool>,

    pub sort_order: Option<i32>,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: u128, parent: Option<u128>, title: &str) -> Category {
        let now = Utc::now();
        Category {
            id: Uuid::from_u128(id),
            category_type: CategoryType::Product,
            parent_id: parent.map(Uuid::from_u128),
            title: title.to_string(),
            slug: title.to_lowercase(),
            description: None,
            is_active: true,
            sort_order: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_build_tree_nests_children() {
        let tree = CategoryTreeDto::build_tree(vec![
            category(1, None, "Fruit"),
            category(2, Some(1), "Apples"),
            category(3, Some(2), "Green"),
            category(4, None, "Flowers"),
        ]);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].title, "Fruit");
        assert_eq!(tree[0].children[0].title, "Apples");
        assert_eq!(tree[0].children[0].children[0].title, "Green");
        assert!(tree[1].children.is_empty());
    }

    #[test]
    fn test_orphan_promoted_to_root() {
        // Parent is inactive and therefore absent from the list
        let tree = CategoryTreeDto::build_tree(vec![category(2, Some(99), "Apples")]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].title, "Apples");
    }

    #[test]
    fn test_create_dto_rejects_bad_slug() {
        let dto: CreateCategoryDto = serde_json::from_str(
            r#"{"category_type":"course","title":"Baking","slug":"Baking Basics"}"#,
        )
        .unwrap();
        assert!(dto.validate().is_err());
        assert!(dto.is_active);
    }

    #[test]
    fn test_category_type_from_str() {
        assert_eq!("course".parse::<CategoryType>(), Ok(CategoryType::Course));
        assert!("basket".parse::<CategoryType>().is_err());
    }
}
