//! Orders and checkout.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod pricing;
pub mod routes;
pub mod services;

pub use services::OrderService;
