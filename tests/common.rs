// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory resources, the full router and account creation helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `stride_server`

use anyhow::Result;
use axum::Router;
use serde_json::{json, Value};
use std::sync::{Arc, Once};
use stride_server::{
    config::ServerConfig,
    models::{User, UserRole},
    resources::ServerResources,
    server::build_router,
};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Fresh resources over an in-memory database
pub async fn create_test_resources() -> Result<Arc<ServerResources>> {
    init_test_logging();
    let resources = ServerResources::from_config(ServerConfig::for_testing()).await?;
    Ok(Arc::new(resources))
}

/// The complete application router over `resources`
pub fn app(resources: &Arc<ServerResources>) -> Router {
    build_router(Arc::clone(resources))
}

/// Insert an account directly and return it with a session token
pub async fn create_user_with_role(
    resources: &Arc<ServerResources>,
    name: &str,
    email: &str,
    role: UserRole,
) -> Result<(User, String)> {
    let hash = resources.auth_manager.hash_password("password123").await?;
    let user = User::new(name.to_owned(), email.to_owned(), hash, role);
    resources.database.create_user(&user).await?;
    let token = resources.auth_manager.generate_token(&user)?;
    Ok((user, token))
}

/// Insert a regular athlete account
pub async fn create_athlete(
    resources: &Arc<ServerResources>,
    email: &str,
) -> Result<(User, String)> {
    create_user_with_role(resources, "Test Runner", email, UserRole::User).await
}

/// Body for an easy run with no pace targets
pub fn easy_run(user: &User, name: &str, km: f64) -> Value {
    json!({
        "user": user.id,
        "workoutName": name,
        "work": [{ "type": "distance", "distance": { "value": km, "unit": "km" } }]
    })
}

/// Body for an interval session with pace targets
pub fn interval_session(user: &User) -> Value {
    json!({
        "user": user.id,
        "workoutName": "Track 5x1000",
        "warmUp": { "description": "Easy jog", "pace": { "type": "easy", "pace": "05:40" } },
        "work": [{
            "type": "distance",
            "distance": { "value": 1000, "unit": "m" },
            "repetitions": 5,
            "pace": { "type": "interval", "pace": "04:00" }
        }],
        "coolDown": { "description": "Easy jog" }
    })
}
