//! Template engine for bot messages using Jinja2 syntax.
//!
//! Templates live in `templates/bot/` and are embedded into the binary at
//! compile time, so rendering never touches the filesystem.

use minijinja::{Environment, Value};
use std::sync::OnceLock;
use thiserror::Error;

use crate::core::error::AppError;

/// Global template environment
static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

/// Embedded templates: (name, source)
const TEMPLATES: &[(&str, &str)] = &[
    ("welcome", include_str!("../../../templates/bot/welcome.jinja")),
    ("help", include_str!("../../../templates/bot/help.jinja")),
    ("catalog_menu", include_str!("../../../templates/bot/catalog_menu.jinja")),
    ("catalog", include_str!("../../../templates/bot/catalog.jinja")),
    ("product", include_str!("../../../templates/bot/product.jinja")),
    ("cart", include_str!("../../../templates/bot/cart.jinja")),
    ("order_created", include_str!("../../../templates/bot/order_created.jinja")),
    ("orders", include_str!("../../../templates/bot/orders.jinja")),
    ("banned", include_str!("../../../templates/bot/banned.jinja")),
];

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

impl From<TemplateError> for AppError {
    fn from(e: TemplateError) -> Self {
        AppError::Internal(e.to_string())
    }
}

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);

    for (name, source) in TEMPLATES {
        if let Err(e) = env.add_template(name, source) {
            tracing::warn!("Failed to load template {}: {}", name, e);
        }
    }

    env
}

fn get_environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(init_environment)
}

/// Render a named template with any serializable context.
///
/// # Example
/// ```ignore
/// let text = render("cart", minijinja::context! { items => items, total => "450" })?;
/// ```
pub fn render(template_name: &str, ctx: Value) -> Result<String, TemplateError> {
    let template = get_environment()
        .get_template(template_name)
        .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

    template
        .render(ctx)
        .map(|s| s.trim().to_string())
        .map_err(|e| TemplateError::RenderError(e.to_string()))
}

/// Check if a template exists
#[cfg(test)]
pub fn template_exists(template_name: &str) -> bool {
    get_environment().get_template(template_name).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_all_templates_load() {
        for (name, _) in TEMPLATES {
            assert!(template_exists(name), "template {} failed to load", name);
        }
    }

    #[test]
    fn test_missing_template() {
        let result = render("definitely_not_a_real_template", context! {});
        assert!(matches!(result, Err(TemplateError::NotFound(_))));
    }

    #[test]
    fn test_render_cart() {
        let text = render(
            "cart",
            context! {
                items => vec![
                    context! { title => "Fruit basket", quantity => 2, line_total => "1000.00" },
                ],
                removed_count => 1,
                total => "1000.00",
            },
        )
        .unwrap();

        assert!(text.contains("Fruit basket"));
        assert!(text.contains("x2"));
        assert!(text.contains("1000.00"));
        assert!(text.contains("no longer available"));
    }

    #[test]
    fn test_render_empty_cart() {
        let text = render(
            "cart",
            context! { items => Vec::<Value>::new(), removed_count => 0, total => "0" },
        )
        .unwrap();
        assert!(text.contains("empty"));
    }
}
