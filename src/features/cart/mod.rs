//! Shopping cart.
//!
//! Every read goes through [`reconcile`]: lines whose product was deleted or
//! deactivated are removed from storage and reported back in `removed_items`.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod reconcile;
pub mod routes;
pub mod services;

pub use services::CartService;
