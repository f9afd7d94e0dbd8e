use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;

/// Public catalog routes (no authentication required)
pub fn routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route("/api/categories", get(handlers::list_categories))
        .route("/api/categories/{slug}", get(handlers::get_category))
        .with_state(service)
}

/// Admin category management, nested under `/api/admin`
pub fn admin_routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route(
            "/categories",
            get(handlers::admin_list_categories).post(handlers::create_category),
        )
        .route(
            "/categories/{id}",
            put(handlers::update_category).delete(handlers::delete_category),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::database::lazy_test_pool;
    use crate::shared::test_helpers::{with_admin_auth, with_customer_auth};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn admin_app() -> Router {
        admin_routes(Arc::new(CategoryService::new(lazy_test_pool())))
    }

    #[tokio::test]
    async fn test_create_requires_authentication() {
        let response = admin_app()
            .oneshot(
                Request::post("/categories")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_delete_forbidden_for_customer() {
        let response = with_customer_auth(admin_app())
            .oneshot(
                Request::delete("/categories/0190f3d4-7a35-7c4b-9d6e-1a2b3c4d5e6f")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_create_validates_before_touching_database() {
        let response = with_admin_auth(admin_app())
            .oneshot(
                Request::post("/categories")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"category_type":"product","title":"Fruit","slug":"Not A Slug"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
