//! Catalog categories.
//!
//! Two independent trees share the table: `product` categories group basket
//! products and `course` categories group courses. Slugs are unique per type.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::CategoryService;
