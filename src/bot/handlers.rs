//! Dispatcher schema and update handlers

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::{Message, MessageId};
use teloxide::{ApiError, RequestError};

use crate::bot::callbacks::CallbackAction;
use crate::bot::commands::Command;
use crate::bot::views::{self, Screen};
use crate::bot::BotDeps;
use crate::core::error::AppError;
use crate::features::auth::telegram::TelegramUserData;
use crate::features::cart::reconcile::Reconciled;
use crate::features::orders::dtos::CreateOrderDto;
use crate::features::orders::models::OrderSource;
use crate::features::users::models::User;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Products listed per catalog screen
const CATALOG_LIMIT: i64 = 30;

/// Orders listed by `/orders`
const ORDERS_LIMIT: i64 = 10;

/// Creates the dispatcher schema for the bot.
pub fn schema(deps: BotDeps) -> UpdateHandler<HandlerError> {
    let deps_commands = deps.clone();
    let deps_callback = deps.clone();

    dptree::entry()
        .branch(command_handler(deps_commands))
        .branch(callback_handler(deps_callback))
        .branch(fallback_handler(deps))
}

fn command_handler(deps: BotDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        move |bot: Bot, msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move {
                tracing::debug!("Received command {:?} from chat {}", cmd, msg.chat.id);
                handle_command(&bot, &msg, cmd, &deps).await
            }
        },
    ))
}

fn callback_handler(deps: BotDeps) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
        let deps = deps.clone();
        async move { handle_callback(&bot, q, &deps).await }
    })
}

/// Any other message gets the command list
fn fallback_handler(deps: BotDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
        let deps = deps.clone();
        async move {
            let Some(from) = msg.from.as_ref() else {
                return Ok(());
            };
            if resolve_customer(&bot, msg.chat.id, from, &deps).await?.is_none() {
                return Ok(());
            }
            send(&bot, msg.chat.id, views::help()?).await
        }
    })
}

fn profile(from: &teloxide::types::User) -> TelegramUserData {
    TelegramUserData {
        id: from.id.0 as i64,
        first_name: Some(from.first_name.clone()),
        last_name: from.last_name.clone(),
        username: from.username.clone(),
        photo_url: None,
        language_code: from.language_code.clone(),
    }
}

/// Register or refresh the user; banned users get a notice and `None`
async fn resolve_customer(
    bot: &Bot,
    chat_id: ChatId,
    from: &teloxide::types::User,
    deps: &BotDeps,
) -> Result<Option<User>, HandlerError> {
    let user = deps.users.upsert_from_telegram(&profile(from)).await?;

    if user.is_banned {
        tracing::info!("Ignoring update from banned user {}", user.telegram_id);
        bot.send_message(chat_id, views::banned(user.ban_reason.as_deref())?)
            .await?;
        return Ok(None);
    }

    Ok(Some(user))
}

async fn send(bot: &Bot, chat_id: ChatId, screen: Screen) -> Result<(), HandlerError> {
    bot.send_message(chat_id, screen.text)
        .reply_markup(screen.keyboard)
        .await?;
    Ok(())
}

async fn edit(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    screen: Screen,
) -> Result<(), HandlerError> {
    let edited = bot
        .edit_message_text(chat_id, message_id, screen.text.clone())
        .reply_markup(screen.keyboard.clone())
        .await;

    match edited {
        Ok(_) | Err(RequestError::Api(ApiError::MessageNotModified)) => Ok(()),
        Err(e) => {
            tracing::debug!("Edit failed, sending a new message: {}", e);
            send(bot, chat_id, screen).await
        }
    }
}

/// Reply with a screen, or with a short error message for expected failures
async fn present(
    bot: &Bot,
    chat_id: ChatId,
    message_id: Option<MessageId>,
    outcome: Result<Screen, AppError>,
) -> Result<(), HandlerError> {
    match outcome {
        Ok(screen) => match message_id {
            Some(message_id) => edit(bot, chat_id, message_id, screen).await,
            None => send(bot, chat_id, screen).await,
        },
        Err(e) => {
            if matches!(e, AppError::Database(_) | AppError::Internal(_)) {
                tracing::error!("Bot action failed in chat {}: {}", chat_id, e);
            }
            bot.send_message(chat_id, views::error_text(&e)).await?;
            Ok(())
        }
    }
}

async fn handle_command(
    bot: &Bot,
    msg: &Message,
    cmd: Command,
    deps: &BotDeps,
) -> Result<(), HandlerError> {
    let Some(from) = msg.from.as_ref() else {
        return Ok(());
    };
    let Some(user) = resolve_customer(bot, msg.chat.id, from, deps).await? else {
        return Ok(());
    };

    let outcome = match cmd {
        Command::Start => views::main_menu(&user, deps.webapp_url.as_ref()),
        Command::Help => views::help(),
        Command::Catalog => views::catalog_menu(),
        Command::Cart => show_cart(deps, user.telegram_id).await,
        Command::Orders => show_orders(deps, user.telegram_id).await,
        Command::Checkout(code) => checkout(deps, &user, Some(code)).await,
    };

    present(bot, msg.chat.id, None, outcome).await
}

async fn handle_callback(bot: &Bot, q: CallbackQuery, deps: &BotDeps) -> Result<(), HandlerError> {
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(message) = q.message.as_ref() else {
        return Ok(());
    };
    let chat_id = message.chat().id;
    let message_id = message.id();

    let action = match q.data.as_deref().map(str::parse::<CallbackAction>) {
        Some(Ok(action)) => action,
        Some(Err(e)) => {
            tracing::warn!("{} from chat {}", e, chat_id);
            return Ok(());
        }
        None => return Ok(()),
    };

    let Some(user) = resolve_customer(bot, chat_id, &q.from, deps).await? else {
        return Ok(());
    };
    let user_id = user.telegram_id;

    let outcome = match action {
        CallbackAction::Menu => views::main_menu(&user, deps.webapp_url.as_ref()),
        CallbackAction::Catalog(product_type) => deps
            .products
            .list(Some(product_type), None, true, 0, CATALOG_LIMIT)
            .await
            .and_then(|(products, _)| views::catalog(product_type, &products)),
        CallbackAction::Product(id) => deps
            .products
            .get_active(id)
            .await
            .and_then(|p| views::product(&p)),
        CallbackAction::Add(id) | CallbackAction::Inc(id) => {
            deps.cart.add(user_id, id, 1).await.and_then(|c| views::cart(&c))
        }
        CallbackAction::Dec(id) => deps
            .cart
            .decrement(user_id, id)
            .await
            .and_then(|c| views::cart(&c)),
        CallbackAction::Remove(id) => deps
            .cart
            .remove(user_id, id)
            .await
            .and_then(|c| views::cart(&c)),
        CallbackAction::Cart => show_cart(deps, user_id).await,
        CallbackAction::Clear => match deps.cart.clear(user_id).await {
            Ok(()) => views::cart(&Reconciled::default()),
            Err(e) => Err(e),
        },
        CallbackAction::Checkout => checkout(deps, &user, None).await,
        CallbackAction::Orders => show_orders(deps, user_id).await,
    };

    present(bot, chat_id, Some(message_id), outcome).await
}

async fn show_cart(deps: &BotDeps, user_id: i64) -> Result<Screen, AppError> {
    let cart = deps.cart.get(user_id).await?;
    views::cart(&cart)
}

async fn show_orders(deps: &BotDeps, user_id: i64) -> Result<Screen, AppError> {
    let (orders, _) = deps.orders.list_for_user(user_id, 0, ORDERS_LIMIT).await?;
    views::orders(&orders)
}

async fn checkout(deps: &BotDeps, user: &User, code: Option<String>) -> Result<Screen, AppError> {
    let dto = CreateOrderDto {
        promocode: code.filter(|c| !c.trim().is_empty()),
        customer_name: Some(user.display_name()),
        customer_phone: None,
        comment: None,
    };

    let order = deps
        .orders
        .checkout(user.telegram_id, dto, OrderSource::Bot)
        .await?;
    views::order_created(&order)
}
