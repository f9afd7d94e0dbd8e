use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::pages::models::Page;
use crate::features::pages::themes::{StylePreset, ThemeTemplate};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PageResponseDto {
    pub slug: String,
    pub title: String,
    /// Free-form blocks edited in the admin panel
    #[schema(value_type = Object)]
    pub content: serde_json::Value,
    pub updated_at: Option<DateTime<Utc>>,
}

impl PageResponseDto {
    /// Placeholder served when a page is missing or unreadable
    pub fn empty(slug: &str) -> Self {
        Self {
            slug: slug.to_string(),
            title: String::new(),
            content: serde_json::json!({}),
            updated_at: None,
        }
    }
}

impl From<Page> for PageResponseDto {
    fn from(p: Page) -> Self {
        Self {
            slug: p.slug,
            title: p.title,
            content: p.content,
            updated_at: Some(p.updated_at),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdatePageDto {
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: Option<String>,

    #[schema(value_type = Object)]
    pub content: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ThemeResponseDto {
    /// Applied template, `None` when running on defaults
    pub template_id: Option<String>,
    pub variables: BTreeMap<String, String>,
    pub preset: StylePreset,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ThemeTemplateDto {
    pub id: String,
    pub name: String,
    pub variables: BTreeMap<String, String>,
    pub preset: StylePreset,
}

impl From<&ThemeTemplate> for ThemeTemplateDto {
    fn from(t: &ThemeTemplate) -> Self {
        Self {
            id: t.id.to_string(),
            name: t.name.to_string(),
            variables: crate::features::pages::themes::merged_variables(t),
            preset: t.preset,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ApplyThemeDto {
    #[validate(length(min = 1, max = 50, message = "template_id is required"))]
    pub template_id: String,
}
