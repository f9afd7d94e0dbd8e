//! Inline keyboard callback payloads.
//!
//! Telegram limits `callback_data` to 64 bytes, so actions are encoded as
//! short `verb[:argument]` strings.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use uuid::Uuid;

use crate::features::products::models::ProductType;

/// Telegram's limit on `callback_data`
pub const MAX_CALLBACK_DATA_LEN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    Menu,
    Catalog(ProductType),
    Product(Uuid),
    Add(Uuid),
    Inc(Uuid),
    Dec(Uuid),
    Remove(Uuid),
    Cart,
    Clear,
    Checkout,
    Orders,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown callback data '{0}'")]
pub struct UnknownCallback(pub String);

impl fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackAction::Menu => f.write_str("menu"),
            CallbackAction::Catalog(t) => write!(f, "catalog:{}", t),
            CallbackAction::Product(id) => write!(f, "product:{}", id),
            CallbackAction::Add(id) => write!(f, "add:{}", id),
            CallbackAction::Inc(id) => write!(f, "inc:{}", id),
            CallbackAction::Dec(id) => write!(f, "dec:{}", id),
            CallbackAction::Remove(id) => write!(f, "remove:{}", id),
            CallbackAction::Cart => f.write_str("cart"),
            CallbackAction::Clear => f.write_str("clear"),
            CallbackAction::Checkout => f.write_str("checkout"),
            CallbackAction::Orders => f.write_str("orders"),
        }
    }
}

impl FromStr for CallbackAction {
    type Err = UnknownCallback;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownCallback(data.to_string());

        let action = match data.split_once(':') {
            None => match data {
                "menu" => CallbackAction::Menu,
                "cart" => CallbackAction::Cart,
                "clear" => CallbackAction::Clear,
                "checkout" => CallbackAction::Checkout,
                "orders" => CallbackAction::Orders,
                _ => return Err(unknown()),
            },
            Some(("catalog", "basket")) => CallbackAction::Catalog(ProductType::Basket),
            Some(("catalog", "course")) => CallbackAction::Catalog(ProductType::Course),
            Some((verb, arg)) => {
                let id = Uuid::parse_str(arg).map_err(|_| unknown())?;
                match verb {
                    "product" => CallbackAction::Product(id),
                    "add" => CallbackAction::Add(id),
                    "inc" => CallbackAction::Inc(id),
                    "dec" => CallbackAction::Dec(id),
                    "remove" => CallbackAction::Remove(id),
                    _ => return Err(unknown()),
                }
            }
        };

        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_actions() -> Vec<CallbackAction> {
        let id = Uuid::now_v7();
        vec![
            CallbackAction::Menu,
            CallbackAction::Catalog(ProductType::Basket),
            CallbackAction::Catalog(ProductType::Course),
            CallbackAction::Product(id),
            CallbackAction::Add(id),
            CallbackAction::Inc(id),
            CallbackAction::Dec(id),
            CallbackAction::Remove(id),
            CallbackAction::Cart,
            CallbackAction::Clear,
            CallbackAction::Checkout,
            CallbackAction::Orders,
        ]
    }

    #[test]
    fn test_every_action_parses_back() {
        for action in all_actions() {
            let data = action.to_string();
            assert_eq!(data.parse::<CallbackAction>(), Ok(action), "{}", data);
        }
    }

    #[test]
    fn test_every_action_fits_telegram_limit() {
        for action in all_actions() {
            assert!(action.to_string().len() <= MAX_CALLBACK_DATA_LEN);
        }
    }

    #[test]
    fn test_wire_format() {
        let id = Uuid::parse_str("0190c1f4-7a1b-7cde-8f00-123456789abc").unwrap();
        assert_eq!(
            CallbackAction::Add(id).to_string(),
            "add:0190c1f4-7a1b-7cde-8f00-123456789abc"
        );
        assert_eq!(
            CallbackAction::Catalog(ProductType::Course).to_string(),
            "catalog:course"
        );
    }

    #[test]
    fn test_rejects_garbage() {
        assert!("catalog:toys".parse::<CallbackAction>().is_err());
        assert!("add:not-a-uuid".parse::<CallbackAction>().is_err());
        assert!("buy:0190c1f4-7a1b-7cde-8f00-123456789abc"
            .parse::<CallbackAction>()
            .is_err());
        assert!("".parse::<CallbackAction>().is_err());
    }
}
