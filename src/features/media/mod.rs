//! Admin media library backed by local-disk storage.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::MediaService;
