use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get},
    Router,
};
use std::sync::Arc;

use crate::features::media::dtos::MAX_FILE_SIZE;
use crate::features::media::handlers::{delete_media, list_media, upload_media};
use crate::features::media::services::MediaService;

/// Admin media routes, nested under `/api/admin`
pub fn admin_routes(service: Arc<MediaService>) -> Router {
    Router::new()
        .route(
            "/media",
            // Multipart framing needs some room above MAX_FILE_SIZE
            get(list_media).post(upload_media).layer(DefaultBodyLimit::max(MAX_FILE_SIZE + 1024 * 1024)),
        )
        .route("/media/{id}", delete(delete_media))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::MediaConfig;
    use crate::core::database::lazy_test_pool;
    use crate::modules::storage::LocalStorage;
    use crate::shared::test_helpers::{with_admin_auth, with_customer_auth};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    async fn service() -> Arc<MediaService> {
        let config = MediaConfig {
            dir: std::env::temp_dir().join(format!("storefront-media-{}", uuid::Uuid::new_v4())),
            url_prefix: "/media".to_string(),
        };
        let storage = Arc::new(LocalStorage::new(&config).await.unwrap());
        Arc::new(MediaService::new(lazy_test_pool(), storage))
    }

    fn multipart(content_type: &str, payload: &str) -> Request<Body> {
        let body = format!(
            "--BOUNDARY\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"x.bin\"\r\n\
             Content-Type: {}\r\n\r\n\
             {}\r\n\
             --BOUNDARY--\r\n",
            content_type, payload
        );
        Request::post("/media")
            .header("content-type", "multipart/form-data; boundary=BOUNDARY")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_list_requires_authentication() {
        let response = admin_routes(service().await)
            .oneshot(Request::get("/media").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_upload_forbidden_for_customer() {
        let response = with_customer_auth(admin_routes(service().await))
            .oneshot(multipart("image/png", "png"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_upload_rejects_disallowed_type() {
        let response = with_admin_auth(admin_routes(service().await))
            .oneshot(multipart("application/x-msdownload", "MZ"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_without_file_field() {
        let body = "--BOUNDARY\r\n\
                    Content-Disposition: form-data; name=\"note\"\r\n\r\n\
                    hi\r\n\
                    --BOUNDARY--\r\n";
        let request = Request::post("/media")
            .header("content-type", "multipart/form-data; boundary=BOUNDARY")
            .body(Body::from(body))
            .unwrap();

        let response = with_admin_auth(admin_routes(service().await))
            .oneshot(request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
