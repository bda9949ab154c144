//! HTTP tests for the order ledger router
//!
//! Drives the full router with `tower::ServiceExt::oneshot`, checking status
//! codes and JSON shapes for every endpoint.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
    response::Response,
};
use order_ledger_core::InMemoryEventLog;
use order_ledger_runtime::Ledger;
use order_ledger_runtime::metrics::MetricsRecorder;
use order_ledger_testing::{SequentialIdGenerator, test_environment, test_ledger};
use order_ledger_web::{AppState, CORRELATION_ID_HEADER, build_router};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn send(app: &Router, method: Method, uri: &str) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn app() -> Router {
    build_router(AppState::new(test_ledger()))
}

#[tokio::test]
async fn create_returns_201_with_order_id() {
    let app = app();

    let response = send(&app, Method::POST, "/orders").await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(response.headers().contains_key(CORRELATION_ID_HEADER));
    assert_eq!(json_body(response).await, json!({ "order_id": "order-1" }));
}

#[tokio::test]
async fn order_lifecycle_over_http() {
    let app = app();
    send(&app, Method::POST, "/orders").await;
    let id = SequentialIdGenerator::id_for(1);

    let response = send(&app, Method::GET, &format!("/orders/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "id": "order-1", "status": "PENDING" })
    );

    let response = send(&app, Method::POST, &format!("/orders/{id}/pay")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, Method::POST, &format!("/orders/{id}/cancel")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, Method::GET, &format!("/orders/{id}")).await;
    assert_eq!(
        json_body(response).await,
        json!({ "id": "order-1", "status": "PAID" })
    );
}

#[tokio::test]
async fn unknown_order_is_404_but_commands_are_accepted() {
    let app = app();

    let response = send(&app, Method::POST, "/orders/ghost/cancel").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, Method::GET, "/orders/ghost").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["message"], "Order with id ghost not found");
}

#[tokio::test]
async fn events_lists_history_in_order() {
    let app = app();
    send(&app, Method::POST, "/orders").await;
    send(&app, Method::POST, "/orders/order-1/pay").await;
    send(&app, Method::POST, "/orders/elsewhere/cancel").await;

    let response = send(&app, Method::GET, "/events").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let events = body.as_array().unwrap();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0]["type"], "OrderCreated");
    assert_eq!(events[1]["type"], "OrderPaid");
    assert_eq!(events[2]["type"], "OrderCanceled");
    assert_eq!(events[2]["order_id"], "elsewhere");
    for (index, event) in events.iter().enumerate() {
        assert_eq!(event["position"], index + 1);
        assert_eq!(event["timestamp"], "2025-01-01T00:00:00Z");
        assert_eq!(event["data"], json!([]));
    }
}

#[tokio::test]
async fn full_log_maps_to_503() {
    let ledger = Ledger::with_log(InMemoryEventLog::with_capacity(1), test_environment());
    let app = build_router(AppState::new(ledger));
    send(&app, Method::POST, "/orders").await;

    let response = send(&app, Method::POST, "/orders").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json_body(response).await["code"], "SERVICE_UNAVAILABLE");

    let response = send(&app, Method::POST, "/orders/order-1/pay").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let response = send(&app, Method::GET, "/orders/order-1").await;
    assert_eq!(
        json_body(response).await,
        json!({ "id": "order-1", "status": "PENDING" })
    );
}

#[tokio::test]
async fn health_reports_counts() {
    let app = app();
    send(&app, Method::POST, "/orders").await;
    send(&app, Method::POST, "/orders/nobody/pay").await;

    let response = send(&app, Method::GET, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "status": "ok", "events": 2, "orders": 1 })
    );
}

#[tokio::test]
async fn metrics_is_404_without_recorder() {
    let response = send(&app(), Method::GET, "/metrics").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn metrics_renders_prometheus_text() {
    let mut recorder = MetricsRecorder::new();
    recorder.install().unwrap();
    let app = build_router(AppState::new(test_ledger()).with_metrics(recorder));
    send(&app, Method::POST, "/orders").await;

    let response = send(&app, Method::GET, "/metrics").await;

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("# HELP ledger_events_appended_total"));
    assert!(text.contains("ledger_events_appended_total{event_type=\"OrderCreated\"}"));
}

#[tokio::test]
async fn unsupported_method_is_405() {
    let response = send(&app(), Method::DELETE, "/orders/order-1").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
