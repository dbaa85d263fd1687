// ABOUTME: HTTP middleware for request tracing, authentication and CORS
// ABOUTME: Provides request ID generation, request spans and caller identity extraction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Caller identity from cookie or bearer token
pub mod auth;
/// Cross-origin settings
pub mod cors;
/// Request ids and request spans
pub mod tracing;

pub use self::auth::{authenticate_request, extract_token, AuthenticatedUser};
pub use self::cors::setup_cors;
pub use self::tracing::{create_request_span, with_request_tracing, REQUEST_ID_HEADER};
