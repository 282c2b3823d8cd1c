//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use std::path::Path;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get, MemoryStore};
use tower::ServiceExt;
use widgetboard_core::widget_config::ConfigDocument;

#[tokio::test]
async fn health_check_returns_ok_with_json() {
    let app = common::build_test_app(MemoryStore::new());
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["widget_configs"], 4);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = common::build_test_app(MemoryStore::new());
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = common::build_test_app(MemoryStore::new());
    let response = get(app, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

#[tokio::test]
async fn cors_preflight_returns_correct_headers() {
    let app = common::build_test_app(MemoryStore::new());

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/dashboard/1")
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "DELETE")
        .header("Access-Control-Request-Headers", "authorization")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap().to_str().unwrap(),
        "http://localhost:5173"
    );
    let allow_methods = headers
        .get("access-control-allow-methods")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(allow_methods.contains("DELETE"), "got: {allow_methods}");
}

#[test]
fn shipped_widget_configuration_parses() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/widgets.json");
    let document = ConfigDocument::from_file(&path).unwrap();
    let (configs, translations, roles) = document.into_parts();

    assert!(configs.get("sales_overview").is_some());
    assert!(translations.contains_key("dashboard.widget.sales_overview.label"));
    assert!(roles["admin"].iter().any(|p| p == "dashboard_delete"));
}
