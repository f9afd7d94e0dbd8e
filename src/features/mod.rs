pub mod auth;
pub mod cart;
pub mod categories;
pub mod favorites;
pub mod media;
pub mod orders;
pub mod pages;
pub mod products;
pub mod promocodes;
pub mod users;
