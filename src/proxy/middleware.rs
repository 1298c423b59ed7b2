//! Middleware implementations for the proxy service

use crate::proxy::types::*;
use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Instant;
use tracing::{error, info};
use uuid::Uuid;

fn fresh_request_id() -> Option<HeaderValue> {
    HeaderValue::from_str(&Uuid::now_v7().to_string()).ok()
}

/// Request ID middleware - ensures every request has a unique ID for tracing
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    // Keep a caller-supplied ID only when it is a valid UUID
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .and_then(|uuid| HeaderValue::from_str(&uuid.to_string()).ok())
        .or_else(fresh_request_id);

    if let Some(id) = &request_id {
        request.headers_mut().insert(REQUEST_ID_HEADER, id.clone());
    }

    let mut response = next.run(request).await;

    if let Some(id) = request_id {
        response.headers_mut().insert(REQUEST_ID_HEADER, id);
    }

    response
}

/// Logging middleware - logs request/response details with timing
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();

    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    info!(
        request_id = request_id,
        method = %method,
        path = %uri.path(),
        "Incoming request"
    );

    let response = next.run(request).await;
    let duration = start.elapsed();

    info!(
        request_id = request_id,
        method = %method,
        path = %uri.path(),
        status = response.status().as_u16(),
        duration_ms = duration.as_millis(),
        "Request completed"
    );

    response
}

/// Logs failed requests with their request ID
pub async fn error_handling_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let response = next.run(request).await.into_response();
    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        error!(
            request_id = request_id,
            status = status.as_u16(),
            "Request failed"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware::from_fn, routing::post, Router};
    use http::StatusCode;
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route(
                "/echo-id",
                post(|request: Request| async move {
                    request
                        .headers()
                        .get(REQUEST_ID_HEADER)
                        .and_then(|h| h.to_str().ok())
                        .unwrap_or_default()
                        .to_string()
                }),
            )
            .layer(from_fn(request_id_middleware))
    }

    #[tokio::test]
    async fn test_request_id_is_generated() {
        let request = http::Request::builder()
            .method("POST")
            .uri("/echo-id")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let header = response.headers()[REQUEST_ID_HEADER].to_str().unwrap().to_string();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(Uuid::parse_str(&header).unwrap().get_version_num(), 7);
        assert_eq!(body, header.as_bytes());
    }

    #[tokio::test]
    async fn test_valid_request_id_is_propagated() {
        let id = Uuid::now_v7().to_string();
        let request = http::Request::builder()
            .method("POST")
            .uri("/echo-id")
            .header(REQUEST_ID_HEADER, &id)
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.headers()[REQUEST_ID_HEADER], id.as_str());
    }

    #[tokio::test]
    async fn test_invalid_request_id_is_replaced() {
        let request = http::Request::builder()
            .method("POST")
            .uri("/echo-id")
            .header(REQUEST_ID_HEADER, "not-a-uuid")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        let header = response.headers()[REQUEST_ID_HEADER].to_str().unwrap();
        assert!(Uuid::parse_str(header).is_ok());
    }
}
