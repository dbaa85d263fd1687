// ABOUTME: Fitness intelligence for runners: VDOT estimation, pace tables and race prediction
// ABOUTME: Stateless, side-effect-free functions shared by the server and its tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Stride Intelligence
//!
//! The fitness estimator behind Stride. A race performance (distance and
//! time) yields a VDOT score; a VDOT score yields a table of training paces
//! and predicted race times at the standard distances.
//!
//! ```rust
//! use stride_intelligence::{compute_fitness_score, get_training_paces};
//!
//! # fn main() -> stride_core::errors::AppResult<()> {
//! let score = compute_fitness_score(5.0, 1200)?; // 5 km in 20:00
//! let paces = get_training_paces(score.value())?;
//! assert!(paces.easy.total_seconds() > paces.threshold.total_seconds());
//! # Ok(())
//! # }
//! ```
//!
//! Every function here is pure. Identical inputs always give bit-identical
//! results and nothing is cached between calls.

/// Core estimation algorithms (VDOT from race performance)
pub mod algorithms;

/// Training pace derivation and `mm:ss` formatting
pub mod paces;

/// Race time prediction from a VDOT score
pub mod prediction;

pub use algorithms::vdot::{compute_fitness_score, FitnessScore, RacePerformance};
pub use paces::{get_training_paces, training_paces, Pace, PaceTable, PaceUnit, TrainingIntensity};
pub use prediction::{
    format_race_time, parse_race_time, predict_race_time, race_predictions, RacePrediction,
};
