// ABOUTME: Integration tests for the assembled application router
// ABOUTME: Covers health probes, the JSON 404 fallback, request ids and CORS
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use helpers::axum_test::AxumTestRequest;
use serde_json::Value;
use uuid::Uuid;

#[tokio::test]
async fn test_health_and_readiness() {
    let resources = common::create_test_resources().await.unwrap();
    let app = common::app(&resources);

    let health = AxumTestRequest::get("/health").send(app.clone()).await;
    assert_eq!(health.status(), 200);
    let body: Value = health.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());

    let ready = AxumTestRequest::get("/ready").send(app).await;
    assert_eq!(ready.status(), 200);
    let body: Value = ready.json();
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let resources = common::create_test_resources().await.unwrap();

    let response = AxumTestRequest::get("/api/nothing-here")
        .send(common::app(&resources))
        .await;
    assert_eq!(response.status(), 404);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["statusCode"], 404);
    assert_eq!(body["message"], "Route not found");
}

#[tokio::test]
async fn test_request_id_generated_and_propagated() {
    let resources = common::create_test_resources().await.unwrap();
    let app = common::app(&resources);

    let generated = AxumTestRequest::get("/health").send(app.clone()).await;
    let request_id = generated.header("x-request-id").unwrap();
    assert!(Uuid::parse_str(&request_id).is_ok());

    let supplied = AxumTestRequest::get("/health")
        .header("x-request-id", "client-chosen-id")
        .send(app)
        .await;
    assert_eq!(
        supplied.header("x-request-id").as_deref(),
        Some("client-chosen-id")
    );
}

#[tokio::test]
async fn test_cors_preflight() {
    let resources = common::create_test_resources().await.unwrap();

    let response = AxumTestRequest::options("/api/auth/signin")
        .header("Origin", "https://app.example.com")
        .header("Access-Control-Request-Method", "POST")
        .send(common::app(&resources))
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.header("access-control-allow-origin").as_deref(),
        Some("*")
    );
}
