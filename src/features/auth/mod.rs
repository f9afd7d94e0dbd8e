//! Telegram-based authentication.
//!
//! Shoppers sign in with WebApp `initData` or the Login Widget; either way the
//! payload is verified against the bot token and exchanged for an HS256
//! session token. Admin rights come from `ADMIN_TELEGRAM_IDS`.

pub mod dtos;
pub mod guards;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod services;
pub mod telegram;

pub use services::{AuthService, TokenService};
