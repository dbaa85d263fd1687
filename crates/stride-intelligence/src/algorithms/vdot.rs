// ABOUTME: VDOT (running fitness score) estimation from a race performance
// ABOUTME: Implements the Daniels-Gilbert oxygen-cost and percent-of-max equations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! VDOT estimation.
//!
//! The score is the oxygen cost of the race velocity divided by the fraction
//! of maximal aerobic capacity a runner can sustain for the race duration:
//!
//! ```text
//! v        = distance / time                          (m/min)
//! VO2(v)   = -4.60 + 0.182258·v + 0.000104·v²         (ml/kg/min)
//! %max(t)  = 0.8 + 0.1894393·e^(-0.012778·t)
//!                + 0.2989558·e^(-0.1932605·t)         (t in minutes)
//! VDOT     = VO2(v) / %max(t)
//! ```
//!
//! # Scientific References
//!
//! - Daniels, J. & Gilbert, J. (1979). *Oxygen Power: Performance Tables for Distance Runners*.
//! - Daniels, J. (2013). "Daniels' Running Formula" (3rd ed.). Human Kinetics.

use serde::Serialize;
use std::fmt;
use stride_core::constants::units::{METERS_PER_KM, SECONDS_PER_MINUTE};
use stride_core::errors::{AppError, AppResult};

/// Minimum accepted race velocity (m/min), a brisk walk
pub const MIN_VELOCITY: f64 = 50.0;

/// Maximum accepted race velocity (m/min), 30 km/h
pub const MAX_VELOCITY: f64 = 500.0;

/// Lowest score accepted by the pace engine, below any race-derived score
pub const MIN_FITNESS_SCORE: f64 = 1.0;

/// Highest score accepted by the pace engine, above any race-derived score
pub const MAX_FITNESS_SCORE: f64 = 150.0;

/// Oxygen cost coefficient for velocity squared term
const DANIELS_A: f64 = 0.000_104;

/// Oxygen cost coefficient for velocity term
const DANIELS_B: f64 = 0.182_258;

/// Oxygen cost constant term
const DANIELS_C: f64 = -4.60;

/// Asymptotic fraction of max sustainable for very long efforts
const PERCENT_MAX_FLOOR: f64 = 0.8;

const PERCENT_MAX_SLOW_AMPLITUDE: f64 = 0.189_439_3;
const PERCENT_MAX_SLOW_DECAY: f64 = 0.012_778;
const PERCENT_MAX_FAST_AMPLITUDE: f64 = 0.298_955_8;
const PERCENT_MAX_FAST_DECAY: f64 = 0.193_260_5;

/// Oxygen cost of running at `velocity` meters per minute (ml/kg/min)
#[must_use]
pub fn oxygen_cost(velocity: f64) -> f64 {
    (DANIELS_A * velocity).mul_add(velocity, DANIELS_B.mul_add(velocity, DANIELS_C))
}

/// Velocity (m/min) whose oxygen cost equals `vo2`
///
/// Positive root of `A·v² + B·v + (C - vo2) = 0`. Strictly increasing in `vo2`.
#[must_use]
pub fn velocity_for_oxygen_cost(vo2: f64) -> f64 {
    let discriminant = DANIELS_B.mul_add(DANIELS_B, 4.0 * DANIELS_A * (vo2 - DANIELS_C));
    (discriminant.sqrt() - DANIELS_B) / (2.0 * DANIELS_A)
}

/// Fraction of maximal aerobic capacity sustainable for `duration_minutes`
///
/// Decreases with duration: a two-minute effort runs above VO2max pace
/// (fraction > 1), a marathon well below it.
#[must_use]
pub fn percent_max(duration_minutes: f64) -> f64 {
    PERCENT_MAX_FAST_AMPLITUDE.mul_add(
        (-PERCENT_MAX_FAST_DECAY * duration_minutes).exp(),
        PERCENT_MAX_SLOW_AMPLITUDE.mul_add(
            (-PERCENT_MAX_SLOW_DECAY * duration_minutes).exp(),
            PERCENT_MAX_FLOOR,
        ),
    )
}

/// Raw score for a distance in meters covered in `time_seconds`
///
/// Callers are responsible for range checks.
pub(crate) fn raw_score(distance_meters: f64, time_seconds: f64) -> f64 {
    let minutes = time_seconds / SECONDS_PER_MINUTE;
    oxygen_cost(distance_meters / minutes) / percent_max(minutes)
}

/// A completed race: distance in kilometers and whole-second finishing time
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RacePerformance {
    #[serde(rename = "distance")]
    distance_km: f64,
    #[serde(rename = "timeInSeconds")]
    time_seconds: u32,
}

impl RacePerformance {
    /// Validate and build a race performance
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` if the distance is not a positive
    /// finite number or the time is not a positive number of seconds.
    pub fn new(distance_km: f64, time_seconds: i64) -> AppResult<Self> {
        if !distance_km.is_finite() || distance_km <= 0.0 {
            return Err(AppError::invalid_input("Distance must be positive"));
        }
        if time_seconds <= 0 {
            return Err(AppError::invalid_input("Time must be positive"));
        }
        let time_seconds = u32::try_from(time_seconds)
            .map_err(|_| AppError::invalid_input("Time is too large"))?;

        Ok(Self {
            distance_km,
            time_seconds,
        })
    }

    /// Build from optional request fields; absence is invalid input
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` when either field is missing or invalid.
    pub fn from_parts(distance_km: Option<f64>, time_seconds: Option<i64>) -> AppResult<Self> {
        let distance_km =
            distance_km.ok_or_else(|| AppError::invalid_input("Distance is required"))?;
        let time_seconds =
            time_seconds.ok_or_else(|| AppError::invalid_input("Time is required"))?;
        Self::new(distance_km, time_seconds)
    }

    /// Race distance in kilometers
    #[must_use]
    pub const fn distance_km(&self) -> f64 {
        self.distance_km
    }

    /// Finishing time in seconds
    #[must_use]
    pub const fn time_seconds(&self) -> u32 {
        self.time_seconds
    }

    /// Average velocity in meters per minute
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.distance_km * METERS_PER_KM / (f64::from(self.time_seconds) / SECONDS_PER_MINUTE)
    }

    /// Estimate the VDOT score implied by this performance
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` if the average velocity is outside
    /// the supported range.
    pub fn fitness_score(&self) -> AppResult<FitnessScore> {
        let velocity = self.velocity();
        if !(MIN_VELOCITY..=MAX_VELOCITY).contains(&velocity) {
            return Err(AppError::invalid_input(format!(
                "Velocity {velocity:.1} m/min is outside valid range ({MIN_VELOCITY}-{MAX_VELOCITY})"
            )));
        }

        let score = raw_score(
            self.distance_km * METERS_PER_KM,
            f64::from(self.time_seconds),
        );
        tracing::trace!(
            distance_km = self.distance_km,
            time_seconds = self.time_seconds,
            velocity,
            score,
            "Computed fitness score"
        );

        FitnessScore::new(score)
    }
}

/// A VDOT score. Higher is fitter.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct FitnessScore(f64);

impl FitnessScore {
    /// Validate a score supplied from outside the estimator
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` if the score is not positive and
    /// finite, or lies outside `MIN_FITNESS_SCORE..=MAX_FITNESS_SCORE`.
    pub fn new(value: f64) -> AppResult<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(AppError::invalid_input("Fitness score must be positive"));
        }
        if !(MIN_FITNESS_SCORE..=MAX_FITNESS_SCORE).contains(&value) {
            return Err(AppError::invalid_input(format!(
                "Fitness score {value:.1} is outside supported range ({MIN_FITNESS_SCORE}-{MAX_FITNESS_SCORE})"
            )));
        }
        Ok(Self(value))
    }

    /// The raw score
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Score rounded to one decimal, as shown to users
    #[must_use]
    pub fn rounded(self) -> f64 {
        (self.0 * 10.0).round() / 10.0
    }
}

impl fmt::Display for FitnessScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

/// Compute the VDOT score for `distance_km` run in `time_seconds`
///
/// # Errors
///
/// Returns `AppError::InvalidInput` if either input is non-positive or the
/// implied velocity is outside the supported range.
///
/// # Example
///
/// ```rust
/// use stride_intelligence::compute_fitness_score;
///
/// let score = compute_fitness_score(5.0, 1200).unwrap(); // 5K in 20:00
/// assert!((49.0..50.5).contains(&score.value()));
/// ```
pub fn compute_fitness_score(distance_km: f64, time_seconds: i64) -> AppResult<FitnessScore> {
    RacePerformance::new(distance_km, time_seconds)?.fitness_score()
}

#[cfg(test)]
mod tests {
    use super::*;
    use stride_core::errors::ErrorCode;

    #[test]
    fn test_oxygen_cost_and_inverse_agree() {
        for velocity in [60.0, 150.0, 250.0, 400.0] {
            let vo2 = oxygen_cost(velocity);
            assert!((velocity_for_oxygen_cost(vo2) - velocity).abs() < 1e-6);
        }
    }

    #[test]
    fn test_percent_max_decreases_with_duration() {
        let short = percent_max(5.0);
        let medium = percent_max(40.0);
        let long = percent_max(180.0);
        assert!(short > medium && medium > long);
        assert!(long > PERCENT_MAX_FLOOR);
    }

    #[test]
    fn test_five_k_in_twenty_minutes() {
        let score = compute_fitness_score(5.0, 1200).unwrap();
        assert!((49.5..50.1).contains(&score.value()), "got {score}");
    }

    #[test]
    fn test_rejects_non_positive_inputs() {
        for (distance, time) in [(0.0, 1200), (-5.0, 1200), (5.0, 0), (5.0, -60)] {
            let err = compute_fitness_score(distance, time).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidInput);
        }
        assert!(compute_fitness_score(f64::NAN, 1200).is_err());
    }

    #[test]
    fn test_missing_parts_are_invalid_input() {
        let err = RacePerformance::from_parts(None, Some(1200)).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
        let err = RacePerformance::from_parts(Some(5.0), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_velocity_out_of_range() {
        // 5 km in 5 minutes is 1000 m/min
        assert!(compute_fitness_score(5.0, 300).is_err());
        // 1 km in 2 hours is a stroll
        assert!(compute_fitness_score(1.0, 7200).is_err());
    }

    #[test]
    fn test_fitness_score_bounds() {
        assert!(FitnessScore::new(0.0).is_err());
        assert!(FitnessScore::new(-3.0).is_err());
        assert!(FitnessScore::new(f64::INFINITY).is_err());
        assert!(FitnessScore::new(MAX_FITNESS_SCORE + 1.0).is_err());
        assert!(FitnessScore::new(45.0).is_ok());
    }

    #[test]
    fn test_rounded_display() {
        let score = FitnessScore::new(49.8149).unwrap();
        assert!((score.rounded() - 49.8).abs() < f64::EPSILON);
        assert_eq!(score.to_string(), "49.8");
    }
}
