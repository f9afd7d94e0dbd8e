use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::pages::handlers;
use crate::features::pages::services::PageService;

/// Public page and theme routes
pub fn routes(service: Arc<PageService>) -> Router {
    Router::new()
        .route("/api/pages/{slug}", get(handlers::get_page))
        .route("/api/theme", get(handlers::get_theme))
        .with_state(service)
}

/// Admin page editing and theming, nested under `/api/admin`
pub fn admin_routes(service: Arc<PageService>) -> Router {
    Router::new()
        .route("/pages/{slug}", put(handlers::update_page))
        .route("/themes", get(handlers::list_themes))
        .route("/themes/apply", post(handlers::apply_theme))
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

    fn service() -> Arc<PageService> {
        Arc::new(PageService::new(lazy_test_pool()))
    }

    fn json_request(method: &str, uri: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_themes_require_authentication() {
        let response = admin_routes(service())
            .oneshot(Request::get("/themes").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_apply_forbidden_for_customer() {
        let response = with_customer_auth(admin_routes(service()))
            .oneshot(json_request("POST", "/themes/apply", r#"{"template_id":"dark"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_apply_unknown_theme_is_not_found() {
        let response = with_admin_auth(admin_routes(service()))
            .oneshot(json_request("POST", "/themes/apply", r#"{"template_id":"neon"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_themes_for_admin() {
        let response = with_admin_auth(admin_routes(service()))
            .oneshot(Request::get("/themes").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["meta"]["total"], 6);
        assert_eq!(json["data"][0]["id"], "classic");
    }

    #[tokio::test]
    async fn test_update_page_rejects_bad_slug() {
        let response = with_admin_auth(admin_routes(service()))
            .oneshot(json_request("PUT", "/pages/Not%20A%20Slug", r#"{"content":{}}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
