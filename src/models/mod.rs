// ABOUTME: Core data models for Stride users, workouts and weekly training plans
// ABOUTME: Re-exports the record types and their validation helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! - `User`: account, role, personal bests, races and the cached VDOT profile
//! - `Workout`: warm-up, work intervals and cool-down with optional pace targets
//! - `TrainingPlan`: one calendar week of workouts with completion tracking
//!
//! Nested documents (personal bests, segments, plan entries) are plain serde
//! types so they can be stored as JSON columns and returned as-is.

mod plan;
mod user;
mod workout;

pub use plan::{
    validate_week, PlanEntry, PlanEntryInput, PopulatedPlan, PopulatedPlanEntry, TrainingPlan,
    Weekday,
};
pub use user::{
    normalize_email, validate_name, validate_password, CalculatedFrom, PersonalBest,
    PersonalBests, RaceDistance, RecentRace, UpcomingRace, User, UserRole, VdotProfile,
    VdotSource,
};
pub use workout::{
    Distance, DistanceUnit, IntervalKind, PaceTarget, PaceType, Segment, Split, WorkInterval,
    Workout, WorkoutSpec, WorkoutUpdate,
};
