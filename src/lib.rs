// ABOUTME: Main library entry point for the Stride running training API
// ABOUTME: Exposes configuration, persistence, authentication and the REST route groups
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Stride Server
//!
//! A REST API for runners and coaches. Athletes record personal bests and
//! races, get a VDOT fitness score with derived training paces, build
//! workouts with pace targets and organize them into weekly training plans.
//!
//! ## Architecture
//!
//! - **Config**: Environment-driven server settings
//! - **Database**: `SQLite` persistence for users, workouts and plans
//! - **Auth**: JWT session tokens and bcrypt password hashing
//! - **Routes**: Axum route groups sharing [`resources::ServerResources`]
//! - **Intelligence**: VDOT estimation lives in the `stride_intelligence` crate
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use stride_server::config::ServerConfig;
//! use stride_server::resources::ServerResources;
//! use stride_server::server::StrideServer;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     let port = config.http_port;
//!     let resources = Arc::new(ServerResources::from_config(config).await?);
//!     StrideServer::new(resources).run(port).await?;
//!     Ok(())
//! }
//! ```

/// JWT issuing and validation, password hashing
pub mod auth;

/// Environment-driven configuration
pub mod config;

/// `SQLite` persistence layer
pub mod database;

/// Error types and request-body extraction helpers
pub mod errors;

/// Tracing subscriber setup and structured event helpers
pub mod logging;

/// Authentication, CORS and request tracing middleware
pub mod middleware;

/// Domain models: users, workouts and training plans
pub mod models;

/// Shared resources handed to every route handler
pub mod resources;

/// HTTP route groups
pub mod routes;

/// Router assembly and server lifecycle
pub mod server;
