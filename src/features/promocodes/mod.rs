//! Promocodes.
//!
//! A code grants either a percentage or a fixed discount, floored to whole
//! currency units. Eligibility rules live in [`rules`]; redemption happens only
//! when an order is committed, under a row lock on the promocode.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod rules;
pub mod services;

pub use services::PromocodeService;
