//! Telegram users and their moderation.
//!
//! Users are created on first login (web) or `/start` (bot). Admins can ban,
//! unban and annotate users; every ban change is kept in `user_bans`.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::UserService;
