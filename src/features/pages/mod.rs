//! Editable storefront pages and theming.
//!
//! Reads are best-effort: the storefront always gets a page and a theme, even
//! when storage is unavailable.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod themes;

pub use services::PageService;
