//! Message template management.
//!
//! Bot replies are rendered from Jinja2 templates stored in `templates/bot/`.

pub mod engine;

pub use engine::{render, TemplateError};
