// ABOUTME: Route module organization for Stride HTTP endpoints
// ABOUTME: One module per domain, each exposing a Routes type that builds its axum router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route modules for the Stride API
//!
//! Each domain module contains route definitions and thin handlers that
//! validate input, call into the models, the estimator and the database,
//! and shape the JSON response.

/// Signup, signin and signout
pub mod auth;
/// Public VDOT and pace calculators
pub mod fitness;
/// Liveness and readiness
pub mod health;
/// Weekly training plans and completion tracking
pub mod plans;
/// Account management, personal bests and VDOT assignment
pub mod users;
/// Workout management
pub mod workouts;

pub use auth::AuthRoutes;
pub use fitness::FitnessRoutes;
pub use health::HealthRoutes;
pub use plans::PlanRoutes;
pub use users::UserRoutes;
pub use workouts::WorkoutRoutes;
