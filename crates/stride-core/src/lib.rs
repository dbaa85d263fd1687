// ABOUTME: Core types and constants for the Stride running training platform
// ABOUTME: Foundation crate with error handling and domain constants shared by all crates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Stride Core
//!
//! Foundation crate providing shared types and constants for the Stride
//! platform. It changes rarely, so the estimator crate and the server can
//! depend on it without pulling in HTTP or database machinery by default.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode` and `AppResult`
//! - **constants**: Race distances, validation limits and unit conversions

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;
