//! Modules layer - Infrastructure components
//!
//! Contains adapters for infrastructure outside the database, such as file storage.

pub mod storage;
