use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::users::handlers;
use crate::features::users::services::UserService;

/// Admin user moderation routes, nested under `/api/admin`
pub fn admin_routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/users", get(handlers::list_users))
        .route("/users/{id}", get(handlers::get_user))
        .route("/users/{id}/ban", post(handlers::ban_user))
        .route("/users/{id}/unban", post(handlers::unban_user))
        .route("/users/{id}/bans", get(handlers::list_user_bans))
        .route(
            "/users/{id}/notes",
            get(handlers::list_user_notes).post(handlers::add_user_note),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::database::lazy_test_pool;
    use crate::shared::test_helpers::with_customer_auth;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn app() -> Router {
        admin_routes(Arc::new(UserService::new(lazy_test_pool())))
    }

    #[tokio::test]
    async fn test_list_users_requires_authentication() {
        let response = app()
            .oneshot(Request::get("/users").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_ban_forbidden_for_customer() {
        let response = with_customer_auth(app())
            .oneshot(
                Request::post("/users/42/ban")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"reason":"spam"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
