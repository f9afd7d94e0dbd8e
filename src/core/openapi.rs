use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers, model as auth_model};
use crate::features::cart::{dtos as cart_dtos, handlers as cart_handlers};
use crate::features::categories::{
    dtos as categories_dtos, handlers as categories_handlers, models as categories_models,
};
use crate::features::favorites::{dtos as favorites_dtos, handlers as favorites_handlers};
use crate::features::media::{dtos as media_dtos, handlers as media_handlers};
use crate::features::orders::{
    dtos as orders_dtos, handlers as orders_handlers, models as orders_models,
};
use crate::features::pages::{dtos as pages_dtos, handlers as pages_handlers, themes};
use crate::features::products::{
    dtos as products_dtos, handlers as products_handlers, models as products_models,
};
use crate::features::promocodes::{
    dtos as promocodes_dtos, handlers as promocodes_handlers, models as promocodes_models,
};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers, models as users_models};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handlers::login_webapp,
        auth_handlers::login_widget,
        auth_handlers::get_me,
        // Categories (public)
        categories_handlers::list_categories,
        categories_handlers::get_category,
        // Products (public)
        products_handlers::list_products,
        products_handlers::get_product,
        // Cart
        cart_handlers::get_cart,
        cart_handlers::add_cart_item,
        cart_handlers::update_cart_item,
        cart_handlers::remove_cart_item,
        cart_handlers::clear_cart,
        // Favorites
        favorites_handlers::list_favorites,
        favorites_handlers::add_favorite,
        favorites_handlers::remove_favorite,
        // Promocodes
        promocodes_handlers::check_promocode,
        // Orders
        orders_handlers::create_order,
        orders_handlers::list_my_orders,
        orders_handlers::get_my_order,
        // Pages (public)
        pages_handlers::get_page,
        pages_handlers::get_theme,
        // Admin
        categories_handlers::admin_list_categories,
        categories_handlers::create_category,
        categories_handlers::update_category,
        categories_handlers::delete_category,
        products_handlers::admin_list_products,
        products_handlers::create_product,
        products_handlers::update_product,
        products_handlers::toggle_product,
        products_handlers::delete_product,
        promocodes_handlers::list_promocodes,
        promocodes_handlers::create_promocode,
        promocodes_handlers::update_promocode,
        promocodes_handlers::delete_promocode,
        orders_handlers::admin_list_orders,
        orders_handlers::update_order_status,
        users_handlers::list_users,
        users_handlers::get_user,
        users_handlers::ban_user,
        users_handlers::unban_user,
        users_handlers::list_user_bans,
        users_handlers::list_user_notes,
        users_handlers::add_user_note,
        pages_handlers::update_page,
        pages_handlers::list_themes,
        pages_handlers::apply_theme,
        media_handlers::list_media,
        media_handlers::upload_media,
        media_handlers::delete_media,
    ),
    components(
        schemas(
            Meta,
            // Auth
            auth_model::Role,
            auth_dtos::WebAppAuthRequestDto,
            auth_dtos::LoginWidgetRequestDto,
            auth_dtos::AuthUserDto,
            auth_dtos::AuthResponseDto,
            auth_dtos::MeResponseDto,
            ApiResponse<auth_dtos::AuthResponseDto>,
            ApiResponse<auth_dtos::MeResponseDto>,
            // Categories
            categories_models::CategoryType,
            categories_dtos::CategoryResponseDto,
            categories_dtos::CategoryTreeDto,
            categories_dtos::CategoryListing,
            categories_dtos::CreateCategoryDto,
            categories_dtos::UpdateCategoryDto,
            ApiResponse<categories_dtos::CategoryListing>,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            // Products
            products_models::ProductType,
            products_dtos::ProductResponseDto,
            products_dtos::CreateProductDto,
            products_dtos::UpdateProductDto,
            ApiResponse<products_dtos::ProductResponseDto>,
            ApiResponse<Vec<products_dtos::ProductResponseDto>>,
            // Cart & favorites
            cart_dtos::CartItemDto,
            cart_dtos::CartResponseDto,
            cart_dtos::AddCartItemDto,
            cart_dtos::UpdateCartItemDto,
            ApiResponse<cart_dtos::CartResponseDto>,
            favorites_dtos::FavoriteItemDto,
            favorites_dtos::FavoritesResponseDto,
            ApiResponse<favorites_dtos::FavoritesResponseDto>,
            // Promocodes
            promocodes_models::DiscountType,
            promocodes_dtos::CheckPromocodeDto,
            promocodes_dtos::PromocodeCheckResponseDto,
            promocodes_dtos::PromocodeResponseDto,
            promocodes_dtos::CreatePromocodeDto,
            promocodes_dtos::UpdatePromocodeDto,
            ApiResponse<promocodes_dtos::PromocodeCheckResponseDto>,
            ApiResponse<promocodes_dtos::PromocodeResponseDto>,
            ApiResponse<Vec<promocodes_dtos::PromocodeResponseDto>>,
            // Orders
            orders_models::OrderStatus,
            orders_models::OrderSource,
            orders_dtos::CreateOrderDto,
            orders_dtos::OrderItemDto,
            orders_dtos::OrderResponseDto,
            orders_dtos::UpdateOrderStatusDto,
            ApiResponse<orders_dtos::OrderResponseDto>,
            ApiResponse<Vec<orders_dtos::OrderResponseDto>>,
            // Users
            users_models::BanAction,
            users_dtos::UserResponseDto,
            users_dtos::BanUserDto,
            users_dtos::UserBanResponseDto,
            users_dtos::CreateNoteDto,
            users_dtos::UserNoteResponseDto,
            ApiResponse<users_dtos::UserResponseDto>,
            ApiResponse<Vec<users_dtos::UserResponseDto>>,
            ApiResponse<Vec<users_dtos::UserBanResponseDto>>,
            ApiResponse<Vec<users_dtos::UserNoteResponseDto>>,
            ApiResponse<users_dtos::UserNoteResponseDto>,
            // Pages & themes
            themes::ButtonShape,
            themes::StylePreset,
            pages_dtos::PageResponseDto,
            pages_dtos::UpdatePageDto,
            pages_dtos::ThemeResponseDto,
            pages_dtos::ThemeTemplateDto,
            pages_dtos::ApplyThemeDto,
            ApiResponse<pages_dtos::PageResponseDto>,
            ApiResponse<pages_dtos::ThemeResponseDto>,
            ApiResponse<Vec<pages_dtos::ThemeTemplateDto>>,
            // Media
            media_dtos::UploadMediaDto,
            media_dtos::MediaResponseDto,
            ApiResponse<media_dtos::MediaResponseDto>,
            ApiResponse<Vec<media_dtos::MediaResponseDto>>,
        )
    ),
    tags(
        (name = "auth", description = "Telegram sign-in and session"),
        (name = "categories", description = "Product and course categories (public)"),
        (name = "products", description = "Catalog (public)"),
        (name = "cart", description = "Shopping cart"),
        (name = "favorites", description = "Saved products"),
        (name = "promocodes", description = "Promocode preview"),
        (name = "orders", description = "Checkout and order history"),
        (name = "pages", description = "Storefront pages and theme (public)"),
        (name = "admin-catalog", description = "Category and product management (admin only)"),
        (name = "admin-promocodes", description = "Promocode management (admin only)"),
        (name = "admin-orders", description = "Order processing (admin only)"),
        (name = "admin-users", description = "Customers, bans and notes (admin only)"),
        (name = "admin-pages", description = "Page editing and theming (admin only)"),
        (name = "admin-media", description = "Media library (admin only)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Storefront API",
        version = "0.1.0",
        description = "API documentation for the Telegram storefront",
    )
)]
pub struct ApiDoc;

/// Adds the Bearer session token scheme to the OpenAPI document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_admin_and_public_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/cart"));
        assert!(doc.paths.paths.contains_key("/api/admin/themes/apply"));
        assert!(doc.paths.paths.contains_key("/api/auth/telegram/webapp"));
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
