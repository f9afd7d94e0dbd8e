use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

/// Bot commands shown in the Telegram menu
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "main menu")]
    Start,
    #[command(description = "browse baskets and courses")]
    Catalog,
    #[command(description = "show your cart")]
    Cart,
    #[command(description = "your recent orders")]
    Orders,
    #[command(description = "place an order, optionally with a promocode")]
    Checkout(String),
    #[command(description = "list commands")]
    Help,
}

/// Publish the command list in the Telegram UI
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(Command::bot_commands()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/cart", "storebot").unwrap(), Command::Cart);
        assert_eq!(
            Command::parse("/checkout SAVE10", "storebot").unwrap(),
            Command::Checkout("SAVE10".to_string())
        );
        assert_eq!(
            Command::parse("/orders@storebot", "storebot").unwrap(),
            Command::Orders
        );
        assert!(Command::parse("/refund", "storebot").is_err());
    }
}
