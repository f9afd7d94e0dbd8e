use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::orders::handlers;
use crate::features::orders::services::OrderService;

/// Shopper order routes (require a session token)
pub fn routes(service: Arc<OrderService>) -> Router {
    Router::new()
        .route(
            "/api/orders",
            get(handlers::list_my_orders).post(handlers::create_order),
        )
        .route("/api/orders/{id}", get(handlers::get_my_order))
        .with_state(service)
}

/// Admin order management, nested under `/api/admin`
pub fn admin_routes(service: Arc<OrderService>) -> Router {
    Router::new()
        .route("/orders", get(handlers::admin_list_orders))
        .route("/orders/{id}/status", patch(handlers::update_order_status))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::database::lazy_test_pool;
    use crate::features::users::UserService;
    use crate::shared::test_helpers::with_customer_auth;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn service() -> Arc<OrderService> {
        let pool = lazy_test_pool();
        let users = Arc::new(UserService::new(pool.clone()));
        Arc::new(OrderService::new(pool, users))
    }

    #[tokio::test]
    async fn test_status_change_forbidden_for_customer() {
        let response = with_customer_auth(admin_routes(service()))
            .oneshot(
                Request::patch("/orders/0190f3d4-7a35-7c4b-9d6e-1a2b3c4d5e6f/status")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"status":"completed"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_checkout_requires_authentication() {
        let response = routes(service())
            .oneshot(
                Request::post("/api/orders")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_checkout_validates_comment_length() {
        let body = format!(r#"{{"comment":"{}"}}"#, "x".repeat(1001));
        let response = with_customer_auth(routes(service()))
            .oneshot(
                Request::post("/api/orders")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
