mod common;

use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde_json::json;
use std::time::{Duration, Instant};

use mathshare_client::services::http::{ApiClient, ApiRequest};
use mathshare_client::ApiError;

#[tokio::test]
async fn timeout_rejects_with_408_and_configured_seconds() {
    let router = Router::new().route(
        "/slow",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({}))
        }),
    );
    let backend = common::spawn_backend(router).await;
    let client = backend.client();

    let started = Instant::now();
    let err = client
        .api_call(
            "/slow",
            ApiRequest {
                timeout: Duration::from_millis(50),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    let elapsed = started.elapsed();

    assert!(err.is_timeout());
    assert_eq!(err.status(), Some(408));
    assert!(err.to_string().contains("0.05"), "message: {}", err);
    assert!(
        elapsed < Duration::from_millis(500),
        "deadline fired too late: {:?}",
        elapsed
    );
}

#[tokio::test]
async fn non_2xx_with_error_envelope_surfaces_backend_detail() {
    let router = Router::new().route(
        "/missing",
        get(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "detail": "not found" })),
            )
        }),
    );
    let backend = common::spawn_backend(router).await;

    let err = backend
        .client()
        .api_call("/missing", ApiRequest::default())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "not found");
    match err {
        ApiError::Http { body, .. } => assert!(body.is_some()),
        other => panic!("expected Http error, got {:?}", other),
    }
}

#[tokio::test]
async fn non_2xx_without_envelope_synthesizes_from_status_text() {
    let router = Router::new().route(
        "/broken",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>") }),
    );
    let backend = common::spawn_backend(router).await;

    let err = backend
        .client()
        .api_call("/broken", ApiRequest::default())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(err.to_string(), "HTTP 500: Internal Server Error");
}

#[tokio::test]
async fn no_content_resolves_to_the_empty_sentinel() {
    let router = Router::new().route("/gone", delete(|| async { StatusCode::NO_CONTENT }));
    let backend = common::spawn_backend(router).await;

    let body = backend
        .client()
        .api_call(
            "/gone",
            ApiRequest {
                method: reqwest::Method::DELETE,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(body.is_none());
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error_with_status_zero() {
    // Nothing listens on port 1.
    let client = ApiClient::with_base_url("http://127.0.0.1:1");

    let err = client
        .api_call("/exercises", ApiRequest::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Network { .. }));
    assert_eq!(err.status(), Some(0));
    assert!(err.to_string().contains("check your connection"));
}

#[tokio::test]
async fn successful_call_returns_parsed_json_for_the_caller_to_validate() {
    let router = Router::new().route(
        "/value",
        get(|| async { Json(json!({ "anything": [1, 2, 3] })) }),
    );
    let backend = common::spawn_backend(router).await;

    let body = backend
        .client()
        .api_call("/value", ApiRequest::default())
        .await
        .unwrap()
        .expect("body expected");

    assert_eq!(body["anything"], json!([1, 2, 3]));
    assert_eq!(backend.hits(), 1);
}
