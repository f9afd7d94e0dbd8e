use std::collections::BTreeMap;

use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::pages::dtos::{PageResponseDto, ThemeResponseDto, UpdatePageDto};
use crate::features::pages::models::Page;
use crate::features::pages::themes::{self, StylePreset};
use crate::shared::constants::HOME_PAGE_SLUG;
use crate::shared::validation::SLUG_REGEX;

const PAGE_COLUMNS: &str = r#"
    slug, title, content, theme_template, theme_variables, theme_preset, updated_at, updated_by
"#;

/// Service for page content and storefront theming
pub struct PageService {
    pool: PgPool,
}

impl PageService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find(&self, slug: &str) -> Result<Option<Page>> {
        let query = format!("SELECT {} FROM pages WHERE slug = $1", PAGE_COLUMNS);

        sqlx::query_as::<_, Page>(&query)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch page {}: {:?}", slug, e);
                AppError::Database(e)
            })
    }

    /// Page content; a missing page or a storage failure yields an empty page
    pub async fn get_page_or_empty(&self, slug: &str) -> PageResponseDto {
        match self.find(slug).await {
            Ok(Some(page)) => page.into(),
            Ok(None) => PageResponseDto::empty(slug),
            Err(e) => {
                tracing::warn!("Serving empty page '{}' after error: {}", slug, e);
                PageResponseDto::empty(slug)
            }
        }
    }

    /// Theme of the home page, falling back to the defaults
    pub async fn get_theme_or_default(&self) -> ThemeResponseDto {
        match self.find(HOME_PAGE_SLUG).await {
            Ok(Some(page)) => theme_from_page(&page),
            Ok(None) => default_theme(),
            Err(e) => {
                tracing::warn!("Serving default theme after error: {}", e);
                default_theme()
            }
        }
    }

    /// Create or replace page content
    pub async fn upsert_page(
        &self,
        slug: &str,
        dto: UpdatePageDto,
        admin_id: i64,
    ) -> Result<PageResponseDto> {
        if !SLUG_REGEX.is_match(slug) {
            return Err(AppError::Validation(format!("Invalid page slug '{}'", slug)));
        }

        let query = format!(
            r#"
            INSERT INTO pages (slug, title, content, updated_by)
            VALUES ($1, COALESCE($2, ''), $3, $4)
            ON CONFLICT (slug) DO UPDATE SET
                title = COALESCE($2, pages.title),
                content = EXCLUDED.content,
                updated_by = EXCLUDED.updated_by,
                updated_at = NOW()
            RETURNING {}
            "#,
            PAGE_COLUMNS
        );

        let page = sqlx::query_as::<_, Page>(&query)
            .bind(slug)
            .bind(dto.title.as_deref().map(str::trim))
            .bind(&dto.content)
            .bind(admin_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to save page {}: {:?}", slug, e);
                AppError::Database(e)
            })?;

        tracing::info!("Page '{}' updated by admin {}", slug, admin_id);
        Ok(page.into())
    }

    /// Persist a built-in template on the home page and return the merged map
    pub async fn apply_theme(&self, template_id: &str, admin_id: i64) -> Result<ThemeResponseDto> {
        let template = themes::find(template_id)
            .ok_or_else(|| AppError::NotFound(format!("Theme '{}' not found", template_id)))?;

        let variables = themes::merged_variables(template);
        let variables_json = serde_json::to_value(&variables)
            .map_err(|e| AppError::Internal(format!("Failed to encode theme variables: {}", e)))?;
        let preset_json = serde_json::to_value(template.preset)
            .map_err(|e| AppError::Internal(format!("Failed to encode theme preset: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO pages (slug, title, content, theme_template, theme_variables, theme_preset, updated_by)
            VALUES ($1, 'Home', '{}'::jsonb, $2, $3, $4, $5)
            ON CONFLICT (slug) DO UPDATE SET
                theme_template = EXCLUDED.theme_template,
                theme_variables = EXCLUDED.theme_variables,
                theme_preset = EXCLUDED.theme_preset,
                updated_by = EXCLUDED.updated_by,
                updated_at = NOW()
            "#,
        )
        .bind(HOME_PAGE_SLUG)
        .bind(template.id)
        .bind(&variables_json)
        .bind(&preset_json)
        .bind(admin_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to apply theme {}: {:?}", template.id, e);
            AppError::Database(e)
        })?;

        tracing::info!("Theme '{}' applied by admin {}", template.id, admin_id);
        Ok(ThemeResponseDto {
            template_id: Some(template.id.to_string()),
            variables,
            preset: template.preset,
        })
    }
}

fn default_theme() -> ThemeResponseDto {
    ThemeResponseDto {
        template_id: None,
        variables: themes::default_variables(),
        preset: StylePreset::default(),
    }
}

/// Stored theme merged over the defaults, so keys added later still resolve
fn theme_from_page(page: &Page) -> ThemeResponseDto {
    let mut variables = themes::default_variables();
    if let Ok(stored) = serde_json::from_value::<BTreeMap<String, String>>(page.theme_variables.clone()) {
        variables.extend(stored);
    }
    let preset = serde_json::from_value(page.theme_preset.clone()).unwrap_or_default();

    ThemeResponseDto {
        template_id: page.theme_template.clone(),
        variables,
        preset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::pages::themes::ButtonShape;
    use chrono::Utc;

    fn home(variables: serde_json::Value, preset: serde_json::Value) -> Page {
        Page {
            slug: HOME_PAGE_SLUG.to_string(),
            title: "Home".to_string(),
            content: serde_json::json!({}),
            theme_template: Some("dark".to_string()),
            theme_variables: variables,
            theme_preset: preset,
            updated_at: Utc::now(),
            updated_by: None,
        }
    }

    #[test]
    fn test_stored_theme_overrides_defaults() {
        let page = home(
            serde_json::json!({"--color-primary": "#000000"}),
            serde_json::json!({"button_shape": "pill", "show_borders": false}),
        );
        let theme = theme_from_page(&page);

        assert_eq!(theme.template_id.as_deref(), Some("dark"));
        assert_eq!(theme.variables["--color-primary"], "#000000");
        assert_eq!(theme.variables["--radius"], "12px");
        assert_eq!(theme.preset.button_shape, ButtonShape::Pill);
    }

    #[test]
    fn test_corrupt_theme_falls_back() {
        let page = home(serde_json::json!([1, 2]), serde_json::json!("nope"));
        let theme = theme_from_page(&page);

        assert_eq!(theme.variables, themes::default_variables());
        assert_eq!(theme.preset, StylePreset::default());
    }
}
