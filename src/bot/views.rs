//! Bot screens: rendered text plus the inline keyboard under it.

use minijinja::context;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, WebAppInfo};
use url::Url;

use crate::bot::callbacks::CallbackAction;
use crate::core::error::AppError;
use crate::features::cart::reconcile::Reconciled;
use crate::features::orders::models::OrderWithItems;
use crate::features::products::models::{Product, ProductType};
use crate::features::users::models::User;
use crate::shared::templates::render;

#[derive(Debug, Clone)]
pub struct Screen {
    pub text: String,
    pub keyboard: InlineKeyboardMarkup,
}

fn button(label: impl Into<String>, action: CallbackAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(label, action.to_string())
}

fn back_to_menu() -> Vec<InlineKeyboardButton> {
    vec![button("« Menu", CallbackAction::Menu)]
}

fn section_buttons() -> Vec<InlineKeyboardButton> {
    vec![
        button("Baskets", CallbackAction::Catalog(ProductType::Basket)),
        button("Courses", CallbackAction::Catalog(ProductType::Course)),
    ]
}

pub fn main_menu(user: &User, webapp_url: Option<&Url>) -> Result<Screen, AppError> {
    let text = render("welcome", context! { name => user.display_name() })?;

    let mut rows = vec![
        section_buttons(),
        vec![
            button("Cart", CallbackAction::Cart),
            button("My orders", CallbackAction::Orders),
        ],
    ];
    if let Some(url) = webapp_url {
        rows.push(vec![InlineKeyboardButton::web_app(
            "Open store",
            WebAppInfo { url: url.clone() },
        )]);
    }

    Ok(Screen {
        text,
        keyboard: InlineKeyboardMarkup::new(rows),
    })
}

pub fn help() -> Result<Screen, AppError> {
    Ok(Screen {
        text: render("help", context! {})?,
        keyboard: InlineKeyboardMarkup::new(vec![back_to_menu()]),
    })
}

pub fn catalog_menu() -> Result<Screen, AppError> {
    Ok(Screen {
        text: render("catalog_menu", context! {})?,
        keyboard: InlineKeyboardMarkup::new(vec![section_buttons(), back_to_menu()]),
    })
}

pub fn catalog(product_type: ProductType, products: &[Product]) -> Result<Screen, AppError> {
    let heading = match product_type {
        ProductType::Basket => "Baskets",
        ProductType::Course => "Courses",
    };
    let items: Vec<_> = products
        .iter()
        .map(|p| context! { title => p.title, price => p.price.to_string() })
        .collect();
    let text = render("catalog", context! { heading => heading, products => items })?;

    let mut rows: Vec<Vec<InlineKeyboardButton>> = products
        .iter()
        .map(|p| vec![button(p.title.clone(), CallbackAction::Product(p.id))])
        .collect();
    rows.push(back_to_menu());

    Ok(Screen {
        text,
        keyboard: InlineKeyboardMarkup::new(rows),
    })
}

pub fn product(product: &Product) -> Result<Screen, AppError> {
    let text = render(
        "product",
        context! {
            title => product.title,
            category => product.category_title,
            price => product.price.to_string(),
            description => product.description,
        },
    )?;

    Ok(Screen {
        text,
        keyboard: InlineKeyboardMarkup::new(vec![
            vec![button("Add to cart", CallbackAction::Add(product.id))],
            vec![
                button("« Back", CallbackAction::Catalog(product.product_type)),
                button("Cart", CallbackAction::Cart),
            ],
        ]),
    })
}

pub fn cart(cart: &Reconciled) -> Result<Screen, AppError> {
    let items: Vec<_> = cart
        .lines
        .iter()
        .map(|l| {
            context! {
                title => l.title,
                quantity => l.quantity,
                line_total => l.line_total.to_string(),
            }
        })
        .collect();
    let text = render(
        "cart",
        context! {
            items => items,
            removed_count => cart.removed.len(),
            total => cart.total().to_string(),
        },
    )?;

    let mut rows: Vec<Vec<InlineKeyboardButton>> = cart
        .lines
        .iter()
        .map(|l| {
            vec![
                button("−", CallbackAction::Dec(l.product_id)),
                button(format!("{} ×{}", l.title, l.quantity), CallbackAction::Product(l.product_id)),
                button("+", CallbackAction::Inc(l.product_id)),
                button("✕", CallbackAction::Remove(l.product_id)),
            ]
        })
        .collect();
    if !cart.is_empty() {
        rows.push(vec![
            button("Checkout", CallbackAction::Checkout),
            button("Clear", CallbackAction::Clear),
        ]);
    }
    rows.push(back_to_menu());

    Ok(Screen {
        text,
        keyboard: InlineKeyboardMarkup::new(rows),
    })
}

pub fn order_created(order: &OrderWithItems) -> Result<Screen, AppError> {
    let items: Vec<_> = order
        .items
        .iter()
        .map(|i| {
            context! {
                title => i.title,
                quantity => i.quantity,
                line_total => i.line_total.to_string(),
            }
        })
        .collect();
    let text = render(
        "order_created",
        context! {
            number => order.order.number,
            items => items,
            subtotal => order.order.subtotal.to_string(),
            promocode => order.order.promocode_code,
            discount => order.order.discount.to_string(),
            total => order.order.total.to_string(),
        },
    )?;

    Ok(Screen {
        text,
        keyboard: InlineKeyboardMarkup::new(vec![
            vec![button("My orders", CallbackAction::Orders)],
            back_to_menu(),
        ]),
    })
}

pub fn orders(orders: &[OrderWithItems]) -> Result<Screen, AppError> {
    let items: Vec<_> = orders
        .iter()
        .map(|o| {
            context! {
                number => o.order.number,
                total => o.order.total.to_string(),
                status => o.order.status.as_str(),
                created_at => o.order.created_at.format("%Y-%m-%d").to_string(),
            }
        })
        .collect();

    Ok(Screen {
        text: render("orders", context! { orders => items })?,
        keyboard: InlineKeyboardMarkup::new(vec![back_to_menu()]),
    })
}

pub fn banned(reason: Option<&str>) -> Result<String, AppError> {
    Ok(render("banned", context! { reason => reason })?)
}

/// Text shown to the shopper when an action fails
pub fn error_text(e: &AppError) -> String {
    match e {
        AppError::NotFound(msg)
        | AppError::BadRequest(msg)
        | AppError::Validation(msg)
        | AppError::InvalidPromocode(msg)
        | AppError::Conflict(msg)
        | AppError::Forbidden(msg) => msg.clone(),
        _ => "Something went wrong, please try again later.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::cart::reconcile::{reconcile, test_support::row};
    use chrono::Utc;
    use teloxide::types::InlineKeyboardButtonKind;

    fn user() -> User {
        User {
            telegram_id: 42,
            username: Some("ann".to_string()),
            first_name: Some("Ann".to_string()),
            last_name: None,
            photo_url: None,
            language_code: None,
            is_banned: false,
            ban_reason: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_seen_at: Utc::now(),
        }
    }

    fn callback_data(screen: &Screen) -> Vec<String> {
        screen
            .keyboard
            .inline_keyboard
            .iter()
            .flatten()
            .filter_map(|b| match &b.kind {
                InlineKeyboardButtonKind::CallbackData(data) => Some(data.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_main_menu_webapp_button_only_when_configured() {
        let plain = main_menu(&user(), None).unwrap();
        assert!(plain.text.contains("Ann"));
        assert_eq!(plain.keyboard.inline_keyboard.len(), 2);

        let url = Url::parse("https://shop.example.com/app").unwrap();
        let with_app = main_menu(&user(), Some(&url)).unwrap();
        assert_eq!(with_app.keyboard.inline_keyboard.len(), 3);
        assert!(matches!(
            with_app.keyboard.inline_keyboard[2][0].kind,
            InlineKeyboardButtonKind::WebApp(_)
        ));
    }

    #[test]
    fn test_cart_screen_buttons() {
        let reconciled = reconcile(vec![row(1, "250.00", 2, true), row(2, "10.00", 1, false)]);
        let screen = cart(&reconciled).unwrap();

        assert!(screen.text.contains("500.00"));
        assert!(screen.text.contains("1 item(s) were removed"));

        let data = callback_data(&screen);
        assert!(data.iter().any(|d| d.starts_with("inc:")));
        assert!(data.iter().any(|d| d.starts_with("dec:")));
        assert!(data.contains(&"checkout".to_string()));
        assert!(data.iter().all(|d| d.parse::<CallbackAction>().is_ok()));
    }

    #[test]
    fn test_empty_cart_has_no_checkout() {
        let screen = cart(&Reconciled::default()).unwrap();
        assert!(screen.text.contains("empty"));
        assert!(!callback_data(&screen).contains(&"checkout".to_string()));
    }

    #[test]
    fn test_error_text_hides_internal_details() {
        assert_eq!(
            error_text(&AppError::BadRequest("Cart is empty".to_string())),
            "Cart is empty"
        );
        let internal = error_text(&AppError::Internal("pool exhausted".to_string()));
        assert!(!internal.contains("pool"));
    }

    #[test]
    fn test_banned_text() {
        let text = banned(Some("spam")).unwrap();
        assert!(text.contains("spam"));
    }
}
