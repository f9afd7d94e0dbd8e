use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::products::handlers;
use crate::features::products::services::ProductService;

/// Public catalog routes (no authentication required)
pub fn routes(service: Arc<ProductService>) -> Router {
    Router::new()
        .route("/api/products", get(handlers::list_products))
        .route("/api/products/{id}", get(handlers::get_product))
        .with_state(service)
}

/// Admin product management, nested under `/api/admin`
pub fn admin_routes(service: Arc<ProductService>) -> Router {
    Router::new()
        .route(
            "/products",
            get(handlers::admin_list_products).post(handlers::create_product),
        )
        .route(
            "/products/{id}",
            put(handlers::update_product).delete(handlers::delete_product),
        )
        .route("/products/{id}/toggle", post(handlers::toggle_product))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::database::lazy_test_pool;
    use crate::features::categories::CategoryService;
    use crate::shared::test_helpers::{with_admin_auth, with_customer_auth};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn service() -> Arc<ProductService> {
        let pool = lazy_test_pool();
        let categories = Arc::new(CategoryService::new(pool.clone()));
        Arc::new(ProductService::new(pool, categories))
    }

    const PRODUCT: &str = "/products/0190f3d4-7a35-7c4b-9d6e-1a2b3c4d5e6f/toggle";

    #[tokio::test]
    async fn test_toggle_requires_authentication() {
        let response = admin_routes(service())
            .oneshot(Request::post(PRODUCT).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_toggle_forbidden_for_customer() {
        let response = with_customer_auth(admin_routes(service()))
            .oneshot(Request::post(PRODUCT).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_negative_price_rejected() {
        let response = with_admin_auth(admin_routes(service()))
            .oneshot(
                Request::post("/products")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"product_type":"course","title":"Baking","price":"-5"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_product_id_rejected() {
        let response = routes(service())
            .oneshot(Request::get("/api/products/not-a-uuid").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
