/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Admin role - manages catalog, promocodes, pages and users
pub const ROLE_ADMIN: &str = "admin";

/// Customer role - any Telegram user that signed in
pub const ROLE_CUSTOMER: &str = "customer";

// =============================================================================
// CART
// =============================================================================

/// Upper bound for a single cart line quantity
pub const MAX_CART_QUANTITY: i32 = 99;

/// Page slug that carries the storefront theme
pub const HOME_PAGE_SLUG: &str = "home";
