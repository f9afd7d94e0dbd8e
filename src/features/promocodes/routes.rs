use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::promocodes::handlers;
use crate::features::promocodes::services::PromocodeService;

/// Shopper promocode routes (require a session token)
pub fn routes(service: Arc<PromocodeService>) -> Router {
    Router::new()
        .route("/api/promocodes/check", post(handlers::check_promocode))
        .with_state(service)
}

/// Admin promocode management, nested under `/api/admin`
pub fn admin_routes(service: Arc<PromocodeService>) -> Router {
    Router::new()
        .route(
            "/promocodes",
            get(handlers::list_promocodes).post(handlers::create_promocode),
        )
        .route(
            "/promocodes/{id}",
            put(handlers::update_promocode).delete(handlers::delete_promocode),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::database::lazy_test_pool;
    use crate::features::cart::CartService;
    use crate::features::categories::CategoryService;
    use crate::features::products::ProductService;
    use crate::shared::test_helpers::{with_admin_auth, with_customer_auth};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn service() -> Arc<PromocodeService> {
        let pool = lazy_test_pool();
        let categories = Arc::new(CategoryService::new(pool.clone()));
        let products = Arc::new(ProductService::new(pool.clone(), categories));
        let cart = Arc::new(CartService::new(pool.clone(), products));
        Arc::new(PromocodeService::new(pool, cart))
    }

    fn json_post(uri: &str, body: &'static str) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_admin_list_requires_authentication() {
        let response = admin_routes(service())
            .oneshot(Request::get("/promocodes").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_forbidden_for_customer() {
        let response = with_customer_auth(admin_routes(service()))
            .oneshot(json_post(
                "/promocodes",
                r#"{"code":"SAVE10","discount_type":"percentage","value":"10"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_create_rejects_percentage_over_hundred() {
        let response = with_admin_auth(admin_routes(service()))
            .oneshot(json_post(
                "/promocodes",
                r#"{"code":"TOOMUCH","discount_type":"percentage","value":"101"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_check_requires_authentication() {
        let response = routes(service())
            .oneshot(json_post("/api/promocodes/check", r#"{"code":"SAVE10"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
