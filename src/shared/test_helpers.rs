#[cfg(test)]
use crate::features::auth::model::{AuthenticatedUser, Role};

#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};

#[cfg(test)]
pub const TEST_ADMIN_ID: i64 = 1001;

#[cfg(test)]
pub const TEST_CUSTOMER_ID: i64 = 2002;

#[cfg(test)]
pub fn create_admin_user() -> AuthenticatedUser {
    AuthenticatedUser {
        telegram_id: TEST_ADMIN_ID,
        role: Role::Admin,
    }
}

#[cfg(test)]
pub fn create_customer_user() -> AuthenticatedUser {
    AuthenticatedUser {
        telegram_id: TEST_CUSTOMER_ID,
        role: Role::Customer,
    }
}

#[cfg(test)]
async fn inject_admin_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_admin_user());
    next.run(request).await
}

#[cfg(test)]
async fn inject_customer_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_customer_user());
    next.run(request).await
}

/// Wrap a router so every request is made by an admin
#[cfg(test)]
#[allow(dead_code)]
pub fn with_admin_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_admin_middleware))
}

/// Wrap a router so every request is made by a regular customer
#[cfg(test)]
pub fn with_customer_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_customer_middleware))
}
