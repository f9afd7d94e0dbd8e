//! Telegram bot front-end.
//!
//! Shoppers browse the catalog, manage their cart and check out from inline
//! keyboards. All state lives in the same services the HTTP API uses.

pub mod callbacks;
pub mod commands;
pub mod handlers;
pub mod views;

use std::sync::Arc;

use teloxide::prelude::*;
use url::Url;

use crate::features::cart::CartService;
use crate::features::orders::OrderService;
use crate::features::products::ProductService;
use crate::features::users::UserService;

/// Services the bot handlers need
#[derive(Clone)]
pub struct BotDeps {
    pub users: Arc<UserService>,
    pub products: Arc<ProductService>,
    pub cart: Arc<CartService>,
    pub orders: Arc<OrderService>,
    /// Mini-app opened from the main menu
    pub webapp_url: Option<Url>,
}

impl BotDeps {
    pub fn new(
        users: Arc<UserService>,
        products: Arc<ProductService>,
        cart: Arc<CartService>,
        orders: Arc<OrderService>,
        webapp_url: Option<&str>,
    ) -> Self {
        let webapp_url = webapp_url.and_then(|raw| match Url::parse(raw) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!("Ignoring invalid WEBAPP_URL '{}': {}", raw, e);
                None
            }
        });

        Self {
            users,
            products,
            cart,
            orders,
            webapp_url,
        }
    }
}

/// Run long polling until the process exits
pub async fn run(bot: Bot, deps: BotDeps) {
    if let Err(e) = commands::setup_bot_commands(&bot).await {
        tracing::warn!("Failed to publish bot commands: {}", e);
    }

    tracing::info!("Telegram bot started");

    Dispatcher::builder(bot, handlers::schema(deps))
        .default_handler(|update| async move {
            tracing::debug!("Unhandled update: {:?}", update.kind);
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error has occurred in the bot dispatcher",
        ))
        .build()
        .dispatch()
        .await;
}
