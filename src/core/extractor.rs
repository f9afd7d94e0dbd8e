//! Request extractors shared by every feature router.

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request},
    http::request::Parts,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;

/// JSON body extractor whose rejections use the `ApiResponse` envelope
/// instead of axum's plain-text errors
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppJsonRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| Self(value))
            .map_err(AppJsonRejection)
    }
}

pub struct AppJsonRejection(JsonRejection);

impl AppJsonRejection {
    fn message(&self) -> String {
        match &self.0 {
            JsonRejection::JsonDataError(err) => {
                format!("Request body does not match the expected fields: {}", err.body_text())
            }
            JsonRejection::JsonSyntaxError(err) => {
                format!("Request body is not valid JSON: {}", err.body_text())
            }
            JsonRejection::MissingJsonContentType(_) => {
                "Expected 'Content-Type: application/json'".to_string()
            }
            JsonRejection::BytesRejection(_) => "Request body could not be read".to_string(),
            _ => "Failed to parse request body".to_string(),
        }
    }
}

impl IntoResponse for AppJsonRejection {
    fn into_response(self) -> Response {
        AppError::BadRequest(self.message()).into_response()
    }
}

/// Identity placed in request extensions by `auth_middleware`
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Sign in with Telegram first".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::{routing::post, Router};
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize)]
    struct Note {
        body: String,
    }

    fn app() -> Router {
        Router::new()
            .route(
                "/notes",
                post(|AppJson(note): AppJson<Note>| async move { note.body }),
            )
            .route(
                "/whoami",
                axum::routing::get(|user: AuthenticatedUser| async move {
                    user.telegram_id.to_string()
                }),
            )
    }

    async fn post_note(content_type: Option<&str>, body: &str) -> (StatusCode, serde_json::Value) {
        let mut request = axum::http::Request::post("/notes");
        if let Some(content_type) = content_type {
            request = request.header("content-type", content_type);
        }
        let response = app()
            .oneshot(request.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or_default())
    }

    #[tokio::test]
    async fn test_valid_body_extracted() {
        let response = app()
            .oneshot(
                axum::http::Request::post("/notes")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"body":"called back"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_syntax_error_uses_envelope() {
        let (status, json) = post_note(Some("application/json"), "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert!(json["message"]
            .as_str()
            .unwrap()
            .starts_with("Request body is not valid JSON"));
    }

    #[tokio::test]
    async fn test_missing_field_reported() {
        let (status, json) = post_note(Some("application/json"), r#"{"text":"x"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["message"].as_str().unwrap().contains("expected fields"));
    }

    #[tokio::test]
    async fn test_missing_content_type() {
        let (status, json) = post_note(None, r#"{"body":"x"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Expected 'Content-Type: application/json'");
    }

    #[tokio::test]
    async fn test_identity_required() {
        let response = app()
            .oneshot(axum::http::Request::get("/whoami").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
