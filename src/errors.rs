// ABOUTME: Server-side error helpers layered on the shared AppError type
// ABOUTME: Maps request-body rejections and library failures into the unified JSON error shape
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Error handling for the HTTP server.
//!
//! The error type itself lives in `stride_core`; this module re-exports it
//! and adds the conversions that depend on server-only crates.

pub use stride_core::errors::{AppError, AppResult, ErrorCode, ErrorResponse};

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::{async_trait, Json};
use uuid::Uuid;

/// JSON request body whose rejections use the unified error shape
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection_error(&rejection)),
        }
    }
}

/// Convert an axum JSON rejection into a validation error
#[must_use]
pub fn json_rejection_error(rejection: &JsonRejection) -> AppError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            AppError::invalid_input("Expected request with `Content-Type: application/json`")
        }
        _ => AppError::invalid_input(rejection.body_text()),
    }
}

/// Parse a path segment as a record id
///
/// # Errors
///
/// Returns `AppError::InvalidInput` when the segment is not a UUID.
pub fn parse_id(raw: &str, resource: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::invalid_input(format!("Invalid {resource} id")))
}

/// Map a bcrypt failure to an internal error
pub fn password_hash_error(error: bcrypt::BcryptError) -> AppError {
    AppError::internal("Password hashing failed").with_source(error)
}

/// Map a blocking-task join failure to an internal error
pub fn join_error(error: tokio::task::JoinError) -> AppError {
    AppError::internal("Background task failed").with_source(error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "user").unwrap(), id);

        let err = parse_id("not-a-uuid", "workout").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
        assert_eq!(err.message, "Invalid workout id");
    }
}
