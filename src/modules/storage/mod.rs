//! Storage module for uploaded media
//!
//! Provides a local-disk store whose directory is served statically.

mod local_storage;

pub use local_storage::LocalStorage;
