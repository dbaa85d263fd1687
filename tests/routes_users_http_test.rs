// ABOUTME: HTTP integration tests for user account routes
// ABOUTME: Covers profile reads and updates, personal bests, VDOT assignment and account deletion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};
use stride_server::models::UserRole;
use uuid::Uuid;

#[tokio::test]
async fn test_list_and_get_users() {
    let resources = common::create_test_resources().await.unwrap();
    let app = common::app(&resources);
    let (alice, token) = common::create_athlete(&resources, "alice@example.com")
        .await
        .unwrap();
    common::create_athlete(&resources, "bob@example.com")
        .await
        .unwrap();

    let listed = AxumTestRequest::get("/api/user")
        .bearer(&token)
        .send(app.clone())
        .await;
    assert_eq!(listed.status(), 200);
    let body: Value = listed.json();
    assert_eq!(body["count"], 2);
    assert!(body["data"]
        .as_array()
        .unwrap()
        .iter()
        .all(|user| user.get("passwordHash").is_none()));

    let fetched = AxumTestRequest::get(&format!("/api/user/{}", alice.id))
        .bearer(&token)
        .send(app.clone())
        .await;
    assert_eq!(fetched.status(), 200);
    let body: Value = fetched.json();
    assert_eq!(body["user"]["email"], "alice@example.com");

    let missing = AxumTestRequest::get(&format!("/api/user/{}", Uuid::new_v4()))
        .bearer(&token)
        .send(app.clone())
        .await;
    assert_eq!(missing.status(), 404);
    let body: Value = missing.json();
    assert_eq!(body["message"], "User not found");

    let malformed = AxumTestRequest::get("/api/user/not-a-uuid")
        .bearer(&token)
        .send(app)
        .await;
    assert_eq!(malformed.status(), 400);
}

#[tokio::test]
async fn test_update_own_profile() {
    let resources = common::create_test_resources().await.unwrap();
    let (alice, token) = common::create_athlete(&resources, "alice@example.com")
        .await
        .unwrap();

    let response = AxumTestRequest::put(&format!("/api/user/{}", alice.id))
        .bearer(&token)
        .json(&json!({
            "name": "Alice Runner",
            "email": "ALICE.R@example.com",
            "upcomingRaces": [{ "name": "Berlin Marathon", "date": "2026-09-27", "projectedTime": "03:15:00" }]
        }))
        .send(common::app(&resources))
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["message"], "User updated successfully");
    assert_eq!(body["user"]["name"], "Alice Runner");
    assert_eq!(body["user"]["email"], "alice.r@example.com");
    assert_eq!(body["user"]["upcomingRaces"][0]["name"], "Berlin Marathon");

    let stored = resources.database.get_user(alice.id).await.unwrap().unwrap();
    assert_eq!(stored.email, "alice.r@example.com");
    assert!(stored.updated_at >= alice.updated_at);
}

#[tokio::test]
async fn test_password_change_allows_new_signin() {
    let resources = common::create_test_resources().await.unwrap();
    let app = common::app(&resources);
    let (alice, token) = common::create_athlete(&resources, "alice@example.com")
        .await
        .unwrap();

    let response = AxumTestRequest::put(&format!("/api/user/{}", alice.id))
        .bearer(&token)
        .json(&json!({ "password": "new-password" }))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 200);

    let signin = AxumTestRequest::post("/api/auth/signin")
        .json(&json!({ "email": "alice@example.com", "password": "new-password" }))
        .send(app)
        .await;
    assert_eq!(signin.status(), 200);
}

#[tokio::test]
async fn test_cross_account_update_forbidden_unless_admin() {
    let resources = common::create_test_resources().await.unwrap();
    let app = common::app(&resources);
    let (alice, _) = common::create_athlete(&resources, "alice@example.com")
        .await
        .unwrap();
    let (_, bob_token) = common::create_athlete(&resources, "bob@example.com")
        .await
        .unwrap();
    let (_, coach_token) =
        common::create_user_with_role(&resources, "Coach", "coach@example.com", UserRole::Coach)
            .await
            .unwrap();
    let (_, admin_token) =
        common::create_user_with_role(&resources, "Admin", "admin@example.com", UserRole::Admin)
            .await
            .unwrap();

    for token in [&bob_token, &coach_token] {
        let response = AxumTestRequest::put(&format!("/api/user/{}", alice.id))
            .bearer(token)
            .json(&json!({ "name": "Hijacked" }))
            .send(app.clone())
            .await;
        assert_eq!(response.status(), 403);
        let body: Value = response.json();
        assert_eq!(body["message"], "You can only update your own account!");
    }

    let response = AxumTestRequest::put(&format!("/api/user/{}", alice.id))
        .bearer(&admin_token)
        .json(&json!({ "name": "Alice Renamed" }))
        .send(app)
        .await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_update_rejects_duplicate_email() {
    let resources = common::create_test_resources().await.unwrap();
    let (alice, token) = common::create_athlete(&resources, "alice@example.com")
        .await
        .unwrap();
    common::create_athlete(&resources, "bob@example.com")
        .await
        .unwrap();

    let response = AxumTestRequest::put(&format!("/api/user/{}", alice.id))
        .bearer(&token)
        .json(&json!({ "email": "bob@example.com" }))
        .send(common::app(&resources))
        .await;
    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn test_personal_bests_update() {
    let resources = common::create_test_resources().await.unwrap();
    let app = common::app(&resources);
    let (alice, token) = common::create_athlete(&resources, "alice@example.com")
        .await
        .unwrap();

    let response = AxumTestRequest::put(&format!("/api/user/pb/{}", alice.id))
        .bearer(&token)
        .json(&json!({
            "fiveK": { "time": "00:20:00", "date": "2025-05-01", "location": "Parkrun" },
            "tenK": { "time": "00:42:00" }
        }))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["message"], "Personal bests updated successfully");
    assert_eq!(body["user"]["personalBests"]["fiveK"]["timeInSeconds"], 1200);
    assert_eq!(body["user"]["personalBests"]["tenK"]["timeInSeconds"], 2520);

    let bad = AxumTestRequest::put(&format!("/api/user/pb/{}", alice.id))
        .bearer(&token)
        .json(&json!({ "fiveK": { "time": "20 minutes" } }))
        .send(app)
        .await;
    assert_eq!(bad.status(), 400);
}

#[tokio::test]
async fn test_set_vdot_from_each_source() {
    let resources = common::create_test_resources().await.unwrap();
    let app = common::app(&resources);
    let (alice, token) = common::create_athlete(&resources, "alice@example.com")
        .await
        .unwrap();
    let uri = format!("/api/user/vdot/{}", alice.id);

    let manual = AxumTestRequest::put(&uri)
        .bearer(&token)
        .json(&json!({ "manualVdot": 48.26 }))
        .send(app.clone())
        .await;
    assert_eq!(manual.status(), 200);
    let body: Value = manual.json();
    assert_eq!(body["message"], "VDOT updated successfully");
    assert_eq!(body["user"]["vdot"]["value"], 48.3);
    assert_eq!(body["user"]["vdot"]["source"], "manual");
    for intensity in ["easy", "marathon", "threshold", "interval", "repetition"] {
        assert!(body["user"]["vdot"]["trainingPaces"][intensity].is_string());
    }

    let race = AxumTestRequest::put(&uri)
        .bearer(&token)
        .json(&json!({
            "racePerformance": { "distance": 10, "timeInSeconds": 2481, "date": "2025-04-06" }
        }))
        .send(app.clone())
        .await;
    assert_eq!(race.status(), 200);
    let body: Value = race.json();
    let value = body["user"]["vdot"]["value"].as_f64().unwrap();
    assert!((49.5..=50.5).contains(&value), "got {value}");
    assert_eq!(body["user"]["vdot"]["source"], "racePerformance");
    assert_eq!(
        body["user"]["vdot"]["calculatedFrom"]["timeInSeconds"],
        2481
    );

    // No personal bests recorded yet
    let no_pb = AxumTestRequest::put(&uri)
        .bearer(&token)
        .json(&json!({ "fromPersonalBest": true }))
        .send(app.clone())
        .await;
    assert_eq!(no_pb.status(), 400);

    AxumTestRequest::put(&format!("/api/user/pb/{}", alice.id))
        .bearer(&token)
        .json(&json!({ "fiveK": { "time": "00:20:00" }, "marathon": { "time": "03:30:00" } }))
        .send(app.clone())
        .await;

    let from_pb = AxumTestRequest::put(&uri)
        .bearer(&token)
        .json(&json!({ "fromPersonalBest": true }))
        .send(app.clone())
        .await;
    assert_eq!(from_pb.status(), 200);
    let body: Value = from_pb.json();
    assert_eq!(body["user"]["vdot"]["source"], "personalBest");
    assert_eq!(body["user"]["vdot"]["calculatedFrom"]["race"], "fiveK");

    let stored = resources.database.get_user(alice.id).await.unwrap().unwrap();
    assert!(stored.has_vdot());
}

#[tokio::test]
async fn test_set_vdot_rejects_ambiguous_or_invalid_requests() {
    let resources = common::create_test_resources().await.unwrap();
    let app = common::app(&resources);
    let (alice, token) = common::create_athlete(&resources, "alice@example.com")
        .await
        .unwrap();
    let uri = format!("/api/user/vdot/{}", alice.id);

    for body in [
        json!({}),
        json!({ "manualVdot": 50, "fromPersonalBest": true }),
        json!({ "manualVdot": 0 }),
        json!({ "racePerformance": { "distance": 5 } }),
        json!({ "racePerformance": { "distance": -5, "timeInSeconds": 1200 } }),
    ] {
        let response = AxumTestRequest::put(&uri)
            .bearer(&token)
            .json(&body)
            .send(app.clone())
            .await;
        assert_eq!(response.status(), 400, "body {body}");
    }

    let stored = resources.database.get_user(alice.id).await.unwrap().unwrap();
    assert!(!stored.has_vdot());
}

#[tokio::test]
async fn test_delete_user_removes_training_data() {
    let resources = common::create_test_resources().await.unwrap();
    let app = common::app(&resources);
    let (alice, token) = common::create_athlete(&resources, "alice@example.com")
        .await
        .unwrap();

    let created = AxumTestRequest::post("/api/training/workout")
        .bearer(&token)
        .json(&common::easy_run(&alice, "Easy 8k", 8.0))
        .send(app.clone())
        .await;
    assert_eq!(created.status(), 201);

    let response = AxumTestRequest::delete(&format!("/api/user/{}", alice.id))
        .bearer(&token)
        .send(app)
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["message"], "User has been deleted");

    assert!(resources.database.get_user(alice.id).await.unwrap().is_none());
    assert!(resources
        .database
        .list_workouts_for_user(alice.id)
        .await
        .unwrap()
        .is_empty());
}
