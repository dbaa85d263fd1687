// ABOUTME: User authentication route handlers for signup, signin and signout
// ABOUTME: Issues the access_token session cookie alongside a bearer token in the response body
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Authentication routes
//!
//! Signin returns the token in the body and sets it as an http-only cookie,
//! so both browser clients and API clients can authenticate.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use stride_core::constants::error_messages;

use crate::auth::ACCESS_TOKEN_COOKIE;
use crate::config::ServerConfig;
use crate::errors::{AppError, JsonBody};
use crate::logging::AppLogger;
use crate::models::{normalize_email, validate_name, validate_password, PersonalBests, User, UserRole};
use crate::resources::ServerResources;

/// Signup request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Plain-text password
    pub password: String,
    /// `user` (default) or `coach`
    #[serde(default)]
    pub role: Option<UserRole>,
    /// Optional initial personal bests
    #[serde(default)]
    pub personal_bests: Option<PersonalBests>,
}

/// Signin request
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    /// Email address
    pub email: String,
    /// Plain-text password
    pub password: String,
}

/// Build the `Set-Cookie` value for a session token
#[must_use]
pub fn session_cookie(token: &str, config: &ServerConfig) -> String {
    let max_age = config.auth.jwt_expiry_hours.saturating_mul(3600);
    let secure = if config.environment.is_production() {
        "; Secure"
    } else {
        ""
    };
    format!("{ACCESS_TOKEN_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax; Max-Age={max_age}{secure}")
}

/// Build the `Set-Cookie` value that clears the session
#[must_use]
pub fn cleared_session_cookie() -> String {
    format!("{ACCESS_TOKEN_COOKIE}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0")
}

fn set_cookie_header(value: &str) -> Result<HeaderValue, AppError> {
    HeaderValue::from_str(value)
        .map_err(|e| AppError::internal("Invalid session cookie").with_source(e))
}

/// Authentication routes implementation
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/auth/test", get(Self::handle_test))
            .route("/api/auth/signup", post(Self::handle_signup))
            .route("/api/auth/signin", post(Self::handle_signin))
            .route("/api/auth/signout", get(Self::handle_signout))
            .with_state(resources)
    }

    async fn handle_test() -> Json<serde_json::Value> {
        Json(json!({ "success": true, "message": "Auth API is working" }))
    }

    async fn handle_signup(
        State(resources): State<Arc<ServerResources>>,
        JsonBody(request): JsonBody<SignupRequest>,
    ) -> Result<Response, AppError> {
        let name = validate_name(&request.name)?;
        let email = normalize_email(&request.email)?;
        validate_password(&request.password)?;

        let role = request.role.unwrap_or_default();
        if role.is_admin() {
            AppLogger::log_security_event("admin_self_signup", &email, None);
            return Err(AppError::permission_denied(
                "Admin accounts cannot be self-registered",
            ));
        }

        let personal_bests = request
            .personal_bests
            .map(PersonalBests::normalized)
            .transpose()?
            .unwrap_or_default();

        if resources.database.get_user_by_email(&email).await?.is_some() {
            return Err(AppError::already_exists(
                error_messages::USER_ALREADY_EXISTS,
            ));
        }

        let password_hash = resources
            .auth_manager
            .hash_password(&request.password)
            .await?;
        let mut user = User::new(name, email, password_hash, role);
        user.personal_bests = personal_bests;
        resources.database.create_user(&user).await?;

        AppLogger::log_auth_event(&user.id.to_string(), "signup", true, None);

        Ok((
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "message": "User created",
                "user": user,
            })),
        )
            .into_response())
    }

    async fn handle_signin(
        State(resources): State<Arc<ServerResources>>,
        JsonBody(request): JsonBody<SigninRequest>,
    ) -> Result<Response, AppError> {
        let email = request.email.trim().to_lowercase();
        let Some(user) = resources.database.get_user_by_email(&email).await? else {
            AppLogger::log_auth_event("unknown", "signin", false, Some("unknown email"));
            return Err(AppError::auth_invalid(error_messages::INVALID_CREDENTIALS));
        };

        let valid = resources
            .auth_manager
            .verify_password(&request.password, &user.password_hash)
            .await?;
        if !valid {
            AppLogger::log_auth_event(
                &user.id.to_string(),
                "signin",
                false,
                Some("wrong password"),
            );
            return Err(AppError::auth_invalid(error_messages::INVALID_CREDENTIALS));
        }

        let token = resources.auth_manager.generate_token(&user)?;
        let cookie = set_cookie_header(&session_cookie(&token, &resources.config))?;
        AppLogger::log_auth_event(&user.id.to_string(), "signin", true, None);

        Ok((
            StatusCode::OK,
            [(header::SET_COOKIE, cookie)],
            Json(json!({
                "success": true,
                "message": "Signed in successfully",
                "token": token,
                "user": user,
            })),
        )
            .into_response())
    }

    async fn handle_signout() -> Result<Response, AppError> {
        let cookie = set_cookie_header(&cleared_session_cookie())?;
        Ok((
            StatusCode::OK,
            [(header::SET_COOKIE, cookie)],
            Json(json!({ "success": true, "message": "User has been signed out" })),
        )
            .into_response())
    }
}
