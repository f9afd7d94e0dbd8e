use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::cart::handlers;
use crate::features::cart::services::CartService;

/// Shopper cart routes (require a session token)
pub fn routes(service: Arc<CartService>) -> Router {
    Router::new()
        .route(
            "/api/cart",
            get(handlers::get_cart).delete(handlers::clear_cart),
        )
        .route("/api/cart/items", post(handlers::add_cart_item))
        .route(
            "/api/cart/items/{product_id}",
            put(handlers::update_cart_item).delete(handlers::remove_cart_item),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::database::lazy_test_pool;
    use crate::features::categories::CategoryService;
    use crate::features::products::ProductService;
    use crate::shared::test_helpers::with_customer_auth;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn app() -> Router {
        let pool = lazy_test_pool();
        let categories = Arc::new(CategoryService::new(pool.clone()));
        let products = Arc::new(ProductService::new(pool.clone(), categories));
        routes(Arc::new(CartService::new(pool, products)))
    }

    #[tokio::test]
    async fn test_cart_requires_authentication() {
        let response = app()
            .oneshot(Request::get("/api/cart").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_quantity_over_limit_rejected() {
        let response = with_customer_auth(app())
            .oneshot(
                Request::put("/api/cart/items/0190f3d4-7a35-7c4b-9d6e-1a2b3c4d5e6f")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"quantity":100}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
