// ABOUTME: Fitness estimation algorithms module
// ABOUTME: Hosts the Daniels-Gilbert VDOT model and its oxygen-cost helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// VDOT estimation from race performances
pub mod vdot;

pub use vdot::{
    oxygen_cost, percent_max, velocity_for_oxygen_cost, MAX_FITNESS_SCORE, MAX_VELOCITY,
    MIN_FITNESS_SCORE, MIN_VELOCITY,
};
